// src/ingest/mod.rs
//! Reading payment files into raw id pairs.

pub mod reader;
pub mod record;

pub use reader::{parse_pairs, read_pairs, BlankLines};
pub use record::{split_record, Record, DELIMITER};
