// src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::types::UserId;

#[derive(Debug, Error)]
pub enum TrustError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    // Misuse: orchestration defects, never caused by input data.
    #[error("Tier {requested} requested out of order (graph is expanded to tier {completed})")]
    TierOutOfOrder { requested: usize, completed: usize },

    #[error("Cannot add edge {a} - {b}: the graph is sealed once tier expansion starts")]
    GraphSealed { a: UserId, b: UserId },

    #[error("Distance index compiled before expansion finished (tier {completed} of {depth})")]
    IndexNotReady { completed: usize, depth: usize },

    // Resource ceilings.
    #[error("Tier {tier} for user {user} reached {cardinality} entries (limit {limit})")]
    TierTooLarge {
        tier: usize,
        user: UserId,
        cardinality: usize,
        limit: usize,
    },

    #[error("Tier {tier} brought the graph to {total} tier entries (limit {limit})")]
    GraphTooLarge {
        tier: usize,
        total: usize,
        limit: usize,
    },

    #[error("Expansion of tier {tier} exceeded the time budget ({elapsed:?} > {budget:?})")]
    TimeBudget {
        tier: usize,
        elapsed: Duration,
        budget: Duration,
    },
}

impl TrustError {
    /// True for errors that signal a programming or orchestration defect.
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            Self::TierOutOfOrder { .. } | Self::GraphSealed { .. } | Self::IndexNotReady { .. }
        )
    }

    /// True for errors raised by a resource ceiling.
    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(
            self,
            Self::TierTooLarge { .. } | Self::GraphTooLarge { .. } | Self::TimeBudget { .. }
        )
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrustError>;

// Allow `?` on std::io::Error by converting to TrustError::Io with unknown path.
impl From<std::io::Error> for TrustError {
    fn from(source: std::io::Error) -> Self {
        TrustError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl From<toml::de::Error> for TrustError {
    fn from(e: toml::de::Error) -> Self {
        TrustError::Config(e.to_string())
    }
}
