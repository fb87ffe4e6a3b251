// src/graph/extract.rs
//! Edge extraction: raw id pairs to undirected adjacency.

use serde::Serialize;
use tracing::{debug, warn};

use super::social::SocialGraph;
use crate::error::Result;
use crate::types::{IdPair, UserId};

/// Counters from one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub records: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub self_edges: usize,
}

/// Parses both ids of a record, logging and returning `None` on failure.
#[must_use]
pub fn parse_edge(pair: &IdPair) -> Option<(UserId, UserId)> {
    match (UserId::parse(&pair.left), UserId::parse(&pair.right)) {
        (Ok(a), Ok(b)) => Some((a, b)),
        (left, right) => {
            warn!(
                line = pair.line,
                sender = %pair.left,
                receiver = %pair.right,
                "Skipping record with invalid user id ({})",
                left.err().or(right.err()).map_or_else(String::new, |e| e.to_string())
            );
            None
        }
    }
}

/// Adds one undirected edge per well-formed record to `graph`.
///
/// Malformed records are skipped; duplicates collapse into one edge.
///
/// # Errors
/// Returns misuse errors from [`SocialGraph::add_edge`] (a sealed graph).
pub fn extract_into<I>(graph: &mut SocialGraph, records: I) -> Result<ExtractStats>
where
    I: IntoIterator,
    I::Item: Into<IdPair>,
{
    let mut stats = ExtractStats::default();
    for record in records {
        let pair: IdPair = record.into();
        stats.records += 1;
        let Some((a, b)) = parse_edge(&pair) else {
            stats.rejected += 1;
            continue;
        };
        if a == b {
            stats.self_edges += 1;
        }
        graph.add_edge(a, b)?;
        stats.accepted += 1;
    }
    debug!(
        "Extracted {} edges from {} records ({} rejected)",
        stats.accepted, stats.records, stats.rejected
    );
    Ok(stats)
}
