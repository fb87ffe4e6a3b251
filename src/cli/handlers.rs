// src/cli/handlers.rs
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;

use crate::classify;
use crate::config::{Config, CONFIG_FILE};
use crate::exit::TrustExit;
use crate::ingest::{self, BlankLines};
use crate::output;
use crate::pipeline::{BuiltGraph, Pipeline};
use crate::types::IdPair;

/// Loads the explicit config file, or `./trustnet.toml` when none is given.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load_from(p)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Validates settings and reads the batch file.
fn load_batch(config: &Config) -> Result<Vec<IdPair>> {
    config.validate()?;
    let batch = ingest::read_pairs(&config.io.batch, BlankLines::Skip)
        .with_context(|| format!("loading batch file {}", config.io.batch.display()))?;
    Ok(batch)
}

fn build_graph(config: &Config) -> Result<(Pipeline, BuiltGraph)> {
    let batch = load_batch(config)?;
    let pipeline = Pipeline::from_config(config);
    let built = pipeline.build(batch).context("building the payment graph")?;
    Ok((pipeline, built))
}

/// Handles the run command: build, classify the stream, write verdict files.
///
/// # Errors
/// Returns error on unreadable inputs, invalid config, or a failed expansion.
pub fn handle_run(config: &Config) -> Result<TrustExit> {
    let batch = load_batch(config)?;
    let stream = ingest::read_pairs(&config.io.stream, BlankLines::Keep)
        .with_context(|| format!("loading stream file {}", config.io.stream.display()))?;

    let pipeline = Pipeline::from_config(config);
    let report = pipeline.run(batch, &stream).context("building the payment graph")?;
    let written = output::write_columns(&config.io.output_dir, &report.verdicts)?;

    output::print_run_report(&report, &written);
    Ok(TrustExit::Success)
}

/// Handles the query command for one payment.
///
/// # Errors
/// Returns error if the graph cannot be built.
pub fn handle_query(config: &Config, source: &str, target: &str) -> Result<TrustExit> {
    let (pipeline, built) = build_graph(config)?;
    let distance = classify::distance(&built.table, source, target);
    let verdicts: Vec<_> = pipeline
        .policies()
        .iter()
        .map(|p| (p.clone(), classify::classify(&built.table, source, target, p)))
        .collect();
    output::print_query(source, target, distance, &verdicts);
    Ok(TrustExit::Success)
}

/// Handles the stats command.
///
/// # Errors
/// Returns error if the graph cannot be built or serialized.
pub fn handle_stats(config: &Config, json: bool) -> Result<TrustExit> {
    let (_, built) = build_graph(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&built.summary)?);
    } else {
        output::print_graph_summary(&built.summary);
    }
    Ok(TrustExit::Success)
}

/// Handles the init command.
///
/// # Errors
/// Returns error if the file exists (without `--force`) or cannot be written.
pub fn handle_init(path: Option<&Path>, force: bool) -> Result<TrustExit> {
    let path = path.unwrap_or(Path::new(CONFIG_FILE));
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::write_default(path)?;
    println!("{} {}", "Created".green(), path.display());
    Ok(TrustExit::Success)
}
