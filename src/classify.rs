// src/classify.rs
//! Threshold classification of payment pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{Distance, DistanceTable};
use crate::types::UserId;

/// Outcome for one payment under one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Trusted,
    Unverified,
}

impl Verdict {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trusted => "trusted",
            Self::Unverified => "unverified",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range of degrees of separation that count as trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    pub min_tier: usize,
    pub max_tier: usize,
}

impl Policy {
    #[must_use]
    pub fn new(name: impl Into<String>, min_tier: usize, max_tier: usize) -> Self {
        Self {
            name: name.into(),
            min_tier,
            max_tier,
        }
    }

    /// Direct partners, within two hops, within the full depth.
    #[must_use]
    pub fn defaults(depth: usize) -> Vec<Self> {
        vec![
            Self::new("output1", 1, 1),
            Self::new("output2", 1, 2),
            Self::new("output3", 1, depth),
        ]
    }

    #[must_use]
    pub fn admits(&self, distance: Distance) -> bool {
        distance
            .hops()
            .is_some_and(|t| self.min_tier <= t && t <= self.max_tier)
    }
}

/// Classifies one payment from its raw id fields.
///
/// Never fails: unparseable ids, unknown payers and unrelated payees all
/// resolve to [`Verdict::Unverified`].
#[must_use]
pub fn classify(table: &DistanceTable, source: &str, target: &str, policy: &Policy) -> Verdict {
    verdict(distance(table, source, target), policy)
}

/// Classifies one payment under several policies with a single lookup.
#[must_use]
pub fn classify_all(
    table: &DistanceTable,
    source: &str,
    target: &str,
    policies: &[Policy],
) -> Vec<Verdict> {
    let d = distance(table, source, target);
    policies.iter().map(|p| verdict(d, p)).collect()
}

/// Degree of separation between two raw id fields.
#[must_use]
pub fn distance(table: &DistanceTable, source: &str, target: &str) -> Distance {
    match (UserId::parse(source), UserId::parse(target)) {
        (Ok(s), Ok(t)) => table.lookup(s, t),
        _ => Distance::Unknown,
    }
}

fn verdict(distance: Distance, policy: &Policy) -> Verdict {
    if policy.admits(distance) {
        Verdict::Trusted
    } else {
        Verdict::Unverified
    }
}
