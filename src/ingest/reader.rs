// src/ingest/reader.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use super::record::split_record;
use crate::error::{Result, TrustError};
use crate::types::IdPair;

/// What to do with a blank data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankLines {
    /// Drop it. Used for the batch file, where rows carry no position.
    Skip,
    /// Keep it as an id-less pair so verdict rows stay aligned with the input.
    Keep,
}

/// Reads every payment line of `path` as an id pair.
///
/// # Errors
/// Returns `Io` with the offending path if the file cannot be opened or read.
pub fn read_pairs(path: &Path, blanks: BlankLines) -> Result<Vec<IdPair>> {
    let file = File::open(path).map_err(|e| TrustError::io(e, path))?;
    let pairs = parse_pairs(BufReader::new(file), blanks).map_err(|e| TrustError::io(e, path))?;
    debug!("Read {} records from {}", pairs.len(), path.display());
    Ok(pairs)
}

/// Splits buffered payment lines into id pairs.
///
/// The first line is a header and is always dropped. Lines are decoded
/// lossily, so bad bytes in the free-text message never fail the read.
/// Lines without both id fields still produce a pair (with empty ids) so that
/// every data line keeps its position in the verdict output.
///
/// # Errors
/// Returns the underlying I/O error.
pub fn parse_pairs<R: BufRead>(reader: R, blanks: BlankLines) -> std::io::Result<Vec<IdPair>> {
    let mut pairs = Vec::new();
    for (i, raw) in reader.split(b'\n').enumerate().skip(1) {
        let raw = raw?;
        let text = String::from_utf8_lossy(&raw);
        let line = text.trim();
        if line.is_empty() && blanks == BlankLines::Skip {
            continue;
        }
        let pair = match split_record(line) {
            Some(r) => IdPair::new(r.sender, r.receiver),
            None => {
                warn!(line = i + 1, "Record has no id fields");
                IdPair::new("", "")
            }
        };
        pairs.push(pair.at_line(i + 1));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_dropped_and_lines_numbered() -> std::io::Result<()> {
        let input = "time, id1, id2, amount, message\n\
                     2016-11-02 09:49:29, 1, 2, 25.32, Spam\n\
                     \n\
                     2016-11-02 09:49:30, 3, 4, 1.00, a, b\n";
        let pairs = parse_pairs(input.as_bytes(), BlankLines::Skip)?;
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].left.trim(), "1");
        assert_eq!(pairs[0].line, 2);
        assert_eq!(pairs[1].right.trim(), "4");
        assert_eq!(pairs[1].line, 4);
        Ok(())
    }

    #[test]
    fn test_header_only() -> std::io::Result<()> {
        assert!(parse_pairs("1, 2, 3, 4, 5".as_bytes(), BlankLines::Keep)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_truncated_line_keeps_its_slot() -> std::io::Result<()> {
        let pairs = parse_pairs("header\ngarbage\n".as_bytes(), BlankLines::Skip)?;
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].left.is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_stream_line_keeps_its_slot() -> std::io::Result<()> {
        let input = "header\n\
                     t, 1, 2, 1.00, a\n\
                     \n\
                     t, 3, 4, 1.00, b\n\
                     t, 5, 6, 1.00, c\n";
        let pairs = parse_pairs(input.as_bytes(), BlankLines::Keep)?;
        assert_eq!(pairs.len(), 4);
        assert!(pairs[1].left.is_empty() && pairs[1].right.is_empty());
        assert_eq!(pairs[1].line, 3);
        assert_eq!(pairs[2].left.trim(), "3");
        assert_eq!(pairs[3].right.trim(), "6");
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_in_message_is_per_record() -> std::io::Result<()> {
        let mut input = b"header\nt, 1, 2, 1.00, ok\nt, 3, 4, 1.00, bad ".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b"\r\nt, 5, 6, 1.00, ok\n");
        let pairs = parse_pairs(input.as_slice(), BlankLines::Keep)?;
        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[1].left.trim(), pairs[1].right.trim()), ("3", "4"));
        assert_eq!(pairs[2].left.trim(), "5");
        Ok(())
    }
}
