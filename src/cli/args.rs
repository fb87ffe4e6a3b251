// src/cli/args.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "trustnet", version, about = "Payment trust by degree of separation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Read settings from this file instead of ./trustnet.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph from the batch file and classify the stream file
    Run {
        #[command(flatten)]
        graph: GraphArgs,
        #[arg(long, value_name = "FILE")]
        stream: Option<PathBuf>,
        /// Directory for the verdict files
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Classify a single payment between two user ids
    Query {
        source: String,
        target: String,
        #[command(flatten)]
        graph: GraphArgs,
    },
    /// Print graph and tier statistics for the batch file
    Stats {
        #[command(flatten)]
        graph: GraphArgs,
        #[arg(long)]
        json: bool,
    },
    /// Write a default trustnet.toml
    Init {
        #[arg(long, short)]
        force: bool,
    },
}

/// Graph settings shared by every command that builds the graph.
#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    #[arg(long, value_name = "FILE")]
    pub batch: Option<PathBuf>,
    /// Degrees of separation to compute
    #[arg(long, short)]
    pub depth: Option<usize>,
    /// Expand tiers on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl GraphArgs {
    /// Overrides file settings with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(batch) = &self.batch {
            config.io.batch.clone_from(batch);
        }
        if let Some(depth) = self.depth {
            config.graph.depth = depth;
        }
        if self.sequential {
            config.graph.parallel = false;
        }
    }
}
