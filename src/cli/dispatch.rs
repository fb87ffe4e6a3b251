// src/cli/dispatch.rs
//! Command dispatch logic extracted from binary to reduce main function size.

use anyhow::Result;

use super::args::{Cli, Commands};
use super::handlers::{handle_init, handle_query, handle_run, handle_stats, load_config};
use crate::exit::TrustExit;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(cli: &Cli) -> Result<TrustExit> {
    if let Commands::Init { force } = &cli.command {
        return handle_init(cli.config.as_deref(), *force);
    }

    let mut config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Run { graph, stream, out } => {
            graph.apply(&mut config);
            if let Some(stream) = stream {
                config.io.stream.clone_from(stream);
            }
            if let Some(out) = out {
                config.io.output_dir.clone_from(out);
            }
            handle_run(&config)
        }
        Commands::Query { source, target, graph } => {
            graph.apply(&mut config);
            handle_query(&config, source, target)
        }
        Commands::Stats { graph, json } => {
            graph.apply(&mut config);
            handle_stats(&config, *json)
        }
        Commands::Init { .. } => Ok(TrustExit::Success),
    }
}
