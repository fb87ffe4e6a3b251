// src/ingest/record.rs
//! Field splitting for one payment line.
//!
//! Layout: `time, id1, id2, amount, message`. The message is free text that
//! may contain the delimiter, so at most five fields are split off and the
//! last one keeps the remainder of the line.

/// Field separator of the payment files.
pub const DELIMITER: char = ',';

const FIELDS: usize = 5;

/// Borrowed view of one payment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub timestamp: &'a str,
    pub sender: &'a str,
    pub receiver: &'a str,
    pub amount: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Splits a line into fields. Returns `None` when the id fields are missing.
#[must_use]
pub fn split_record(line: &str) -> Option<Record<'_>> {
    let mut fields = line.splitn(FIELDS, DELIMITER);
    let timestamp = fields.next()?;
    let sender = fields.next()?;
    let receiver = fields.next()?;
    Some(Record {
        timestamp: timestamp.trim(),
        sender,
        receiver,
        amount: fields.next().map(str::trim),
        message: fields.next().map(str::trim),
    })
}
