// src/output.rs
//! Verdict files and console summaries.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::classify::{Policy, Verdict};
use crate::error::{Result, TrustError};
use crate::graph::Distance;
use crate::pipeline::{GraphSummary, RunReport, VerdictColumns};

/// Writes one `<policy>.txt` per column into `dir`: one verdict per line, no header.
///
/// # Errors
/// Returns `Io` naming the file that could not be created or written.
pub fn write_columns(dir: &Path, verdicts: &VerdictColumns) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| TrustError::io(e, dir))?;
    verdicts
        .iter()
        .map(|(policy, column)| {
            let path = dir.join(format!("{}.txt", policy.name));
            write_column(&path, column).map_err(|e| TrustError::io(e, &path))?;
            Ok(path)
        })
        .collect()
}

fn write_column(path: &Path, column: &[Verdict]) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for verdict in column {
        writeln!(out, "{verdict}")?;
    }
    out.flush()
}

/// Prints the graph build summary.
pub fn print_graph_summary(summary: &GraphSummary) {
    let g = &summary.graph;
    println!(
        "\n{} {} users | {} edges | depth {}",
        "GRAPH".cyan().bold(),
        g.nodes,
        g.edges,
        g.completed_depth
    );
    println!(
        "  {} records | {} accepted | {}",
        summary.extract.records,
        summary.extract.accepted.to_string().green(),
        format_rejected(summary.extract.rejected)
    );
    for (i, entries) in g.tier_entries.iter().enumerate() {
        println!("  tier {}: {entries} entries", i + 1);
    }
    println!("  built in {} ms", summary.duration_ms);
}

fn format_rejected(n: usize) -> String {
    let text = format!("{n} rejected");
    if n == 0 {
        text.green().to_string()
    } else {
        text.yellow().to_string()
    }
}

/// Prints per-policy verdict counts for a full run.
pub fn print_run_report(report: &RunReport, written: &[PathBuf]) {
    print_graph_summary(&report.summary);
    println!(
        "\n{} {} payments",
        "VERDICTS".cyan().bold(),
        report.verdicts.rows()
    );
    for (i, (policy, _)) in report.verdicts.iter().enumerate() {
        let (trusted, unverified) = report.verdicts.counts(i);
        println!(
            "  {:<10} tiers {}..={}  {} trusted | {} unverified",
            policy.name,
            policy.min_tier,
            policy.max_tier,
            trusted.to_string().green(),
            unverified.to_string().yellow()
        );
    }
    for path in written {
        println!("  {} {}", "wrote".dimmed(), path.display());
    }
    println!("  done in {} ms", report.duration_ms);
}

/// Prints the outcome of a single query.
pub fn print_query(source: &str, target: &str, distance: Distance, verdicts: &[(Policy, Verdict)]) {
    let label = match distance {
        Distance::Hops(n) => format!("{n} hop(s)"),
        Distance::Unknown => "no known relationship".to_string(),
    };
    println!("{} {source} -> {target}: {}", "QUERY".cyan().bold(), label.bold());
    for (policy, verdict) in verdicts {
        let v = match verdict {
            Verdict::Trusted => verdict.as_str().green(),
            Verdict::Unverified => verdict.as_str().yellow(),
        };
        println!("  {:<10} {v}", policy.name);
    }
}
