// src/bin/trustnet.rs
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trustnet_core::cli::{dispatch, Cli};
use trustnet_core::exit::TrustExit;

fn main() -> TrustExit {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    match dispatch::execute(&cli) {
        Ok(code) => code,
        Err(e) => TrustExit::from(Err(e)),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
