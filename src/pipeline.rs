// src/pipeline.rs
//! Batch orchestration: extract, expand, compile, classify.

use std::time::Instant;

use rayon::prelude::{ParallelIterator, ParallelSlice};
use serde::Serialize;
use tracing::info;

use crate::classify::{classify_all, Policy, Verdict};
use crate::config::Config;
use crate::error::Result;
use crate::graph::{
    extract_into, DistanceTable, ExpandOptions, ExtractStats, GraphStats, SocialGraph, TierStats,
};
use crate::types::IdPair;

/// What the build phase did.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub extract: ExtractStats,
    pub graph: GraphStats,
    pub tiers: Vec<TierStats>,
    pub duration_ms: u128,
}

/// A fully expanded graph ready for queries.
pub struct BuiltGraph {
    pub graph: SocialGraph,
    pub table: DistanceTable,
    pub summary: GraphSummary,
}

/// One verdict column per policy, rows in stream order.
#[derive(Debug, Clone, Default)]
pub struct VerdictColumns {
    pub policies: Vec<Policy>,
    pub columns: Vec<Vec<Verdict>>,
}

impl VerdictColumns {
    fn from_rows(policies: &[Policy], rows: Vec<Vec<Verdict>>) -> Self {
        let mut columns: Vec<Vec<Verdict>> = policies
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for row in rows {
            for (column, verdict) in columns.iter_mut().zip(row) {
                column.push(verdict);
            }
        }
        Self {
            policies: policies.to_vec(),
            columns,
        }
    }

    /// Number of classified payments.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// `(trusted, unverified)` counts for column `i`.
    #[must_use]
    pub fn counts(&self, i: usize) -> (usize, usize) {
        let Some(column) = self.columns.get(i) else {
            return (0, 0);
        };
        let trusted = column.iter().filter(|v| **v == Verdict::Trusted).count();
        (trusted, column.len() - trusted)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Policy, &[Verdict])> {
        self.policies.iter().zip(self.columns.iter().map(Vec::as_slice))
    }
}

/// Result of a full run.
pub struct RunReport {
    pub summary: GraphSummary,
    pub verdicts: VerdictColumns,
    pub duration_ms: u128,
}

/// Drives a single batch run with fixed settings.
#[derive(Debug, Clone)]
pub struct Pipeline {
    depth: usize,
    options: ExpandOptions,
    policies: Vec<Policy>,
    chunk_size: usize,
}

impl Pipeline {
    #[must_use]
    pub fn new(depth: usize, options: ExpandOptions, policies: Vec<Policy>) -> Self {
        Self {
            depth,
            options,
            policies,
            chunk_size: 1_000_000,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.graph.depth, config.expand_options(), config.policies())
            .with_chunk_size(config.io.chunk_size)
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Builds, expands and compiles the graph from batch records.
    ///
    /// # Errors
    /// Returns misuse or resource errors from expansion; never fails on bad records.
    pub fn build<I>(&self, batch: I) -> Result<BuiltGraph>
    where
        I: IntoIterator,
        I::Item: Into<IdPair>,
    {
        let started = Instant::now();
        let mut graph = SocialGraph::new(self.depth);
        let extract = extract_into(&mut graph, batch)?;
        info!(
            "Graph has {} users from {} records ({} rejected)",
            graph.len(),
            extract.records,
            extract.rejected
        );

        let tiers = graph.expand_all(&self.options)?;
        let table = DistanceTable::compile(&graph, self.options.parallel)?;

        let summary = GraphSummary {
            extract,
            graph: graph.stats(),
            tiers,
            duration_ms: started.elapsed().as_millis(),
        };
        Ok(BuiltGraph {
            graph,
            table,
            summary,
        })
    }

    /// Classifies the stream in chunks, keeping input order.
    #[must_use]
    pub fn classify_stream(&self, table: &DistanceTable, stream: &[IdPair]) -> VerdictColumns {
        let classify_chunk = |chunk: &[IdPair]| -> Vec<Vec<Verdict>> {
            chunk
                .iter()
                .map(|q| classify_all(table, &q.left, &q.right, &self.policies))
                .collect()
        };
        let chunks: Vec<Vec<Vec<Verdict>>> = if self.options.parallel {
            stream.par_chunks(self.chunk_size).map(classify_chunk).collect()
        } else {
            stream.chunks(self.chunk_size).map(classify_chunk).collect()
        };
        VerdictColumns::from_rows(&self.policies, chunks.into_iter().flatten().collect())
    }

    /// Full run: build from `batch`, then classify `stream`.
    ///
    /// # Errors
    /// Propagates build errors.
    pub fn run<I>(&self, batch: I, stream: &[IdPair]) -> Result<RunReport>
    where
        I: IntoIterator,
        I::Item: Into<IdPair>,
    {
        let started = Instant::now();
        // The arena is released here; only the compiled table is queried.
        let BuiltGraph { table, summary, .. } = self.build(batch)?;

        info!("Classifying {} payments...", stream.len());
        let verdicts = self.classify_stream(&table, stream);
        Ok(RunReport {
            summary,
            verdicts,
            duration_ms: started.elapsed().as_millis(),
        })
    }
}
