pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit;
pub mod graph;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod types;
