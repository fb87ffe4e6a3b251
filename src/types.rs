// src/types.rs
use serde::Serialize;
use std::fmt;
use std::num::ParseIntError;

/// A payment-network user, keyed by the numeric id found in the input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(pub i64);

impl UserId {
    /// Parses an id field, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns the underlying integer parse error for empty or non-numeric text.
    pub fn parse(text: &str) -> Result<Self, ParseIntError> {
        text.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Arena slot of a node inside [`crate::graph::SocialGraph`].
pub type NodeIdx = u32;

/// Two unparsed id fields taken from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPair {
    /// 1-based line number in the source file (0 when built in memory).
    pub line: usize,
    pub left: String,
    pub right: String,
}

impl IdPair {
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            line: 0,
            left: left.into(),
            right: right.into(),
        }
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for IdPair {
    fn from((left, right): (A, B)) -> Self {
        Self::new(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(UserId::parse(" 52575 ").ok(), Some(UserId(52575)));
    }

    #[test]
    fn test_parse_rejects_text() {
        assert!(UserId::parse("abc").is_err());
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("12.5").is_err());
    }
}
