// src/graph/budget.rs
//! Resource ceilings for tier expansion.
//!
//! Expansion cost grows with the size of each frontier, which explodes on
//! dense graphs past depth 2. Every ceiling here is a hard stop: exceeding
//! one aborts the run. Tiers are never truncated.

use std::time::{Duration, Instant};

use crate::error::{Result, TrustError};
use crate::types::UserId;

/// Depth that is known to complete on the reference data without ceilings.
pub const SAFE_DEPTH: usize = 2;

/// Optional hard limits on expansion. `None` disables a limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceBudget {
    /// Largest tier a single user may accumulate.
    pub max_tier_size: Option<usize>,
    /// Largest number of tier entries across the whole graph.
    pub max_total_entries: Option<usize>,
    /// Wall-clock allowance for the whole expansion.
    pub time_budget: Option<Duration>,
}

impl ResourceBudget {
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// True when at least one ceiling is configured.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.max_tier_size.is_some()
            || self.max_total_entries.is_some()
            || self.time_budget.is_some()
    }

    pub(crate) fn deadline(&self, from: Instant) -> Deadline {
        Deadline {
            started: from,
            budget: self.time_budget,
        }
    }

    pub(crate) fn check_tier(&self, tier: usize, user: UserId, cardinality: usize) -> Result<()> {
        match self.max_tier_size {
            Some(limit) if cardinality > limit => Err(TrustError::TierTooLarge {
                tier,
                user,
                cardinality,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Most entries one user's next tier may hold before a ceiling trips,
    /// given `total` entries already stored or claimed.
    pub(crate) fn tier_cap(&self, total: usize) -> Option<usize> {
        let room = self.max_total_entries.map(|limit| limit.saturating_sub(total));
        match (self.max_tier_size, room) {
            (Some(size), Some(room)) => Some(size.min(room)),
            (size, room) => size.or(room),
        }
    }

    pub(crate) fn check_total(&self, tier: usize, total: usize) -> Result<()> {
        match self.max_total_entries {
            Some(limit) if total > limit => Err(TrustError::GraphTooLarge { tier, total, limit }),
            _ => Ok(()),
        }
    }
}

/// Start time plus the optional allowance measured from it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub(crate) fn check(&self, tier: usize) -> Result<()> {
        let Some(budget) = self.budget else {
            return Ok(());
        };
        let elapsed = self.started.elapsed();
        if elapsed > budget {
            return Err(TrustError::TimeBudget {
                tier,
                elapsed,
                budget,
            });
        }
        Ok(())
    }
}

/// How a graph should be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Expand the nodes of one tier on the rayon pool.
    pub parallel: bool,
    pub budget: ResourceBudget,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            budget: ResourceBudget::unlimited(),
        }
    }
}

impl ExpandOptions {
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: ResourceBudget) -> Self {
        self.budget = budget;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlimited_budget_accepts_everything() {
        let b = ResourceBudget::unlimited();
        assert!(!b.is_bounded());
        assert!(b.check_tier(3, UserId(1), usize::MAX).is_ok());
        assert!(b.check_total(3, usize::MAX).is_ok());
    }

    #[test]
    fn test_tier_ceiling_names_user_and_tier() {
        let b = ResourceBudget {
            max_tier_size: Some(10),
            ..ResourceBudget::default()
        };
        let err = b.check_tier(3, UserId(42), 11).err();
        assert!(matches!(
            err,
            Some(TrustError::TierTooLarge { tier: 3, user: UserId(42), cardinality: 11, limit: 10 })
        ));
        assert!(b.check_tier(3, UserId(42), 10).is_ok());
    }

    #[test]
    fn test_tier_cap_takes_tighter_ceiling() {
        assert_eq!(ResourceBudget::unlimited().tier_cap(100), None);
        let b = ResourceBudget {
            max_tier_size: Some(10),
            max_total_entries: Some(50),
            ..ResourceBudget::default()
        };
        assert_eq!(b.tier_cap(0), Some(10));
        assert_eq!(b.tier_cap(45), Some(5));
        assert_eq!(b.tier_cap(80), Some(0));
    }

    #[test]
    fn test_zero_time_budget_trips() {
        let b = ResourceBudget {
            time_budget: Some(Duration::ZERO),
            ..ResourceBudget::default()
        };
        let deadline = b.deadline(Instant::now() - Duration::from_millis(5));
        assert!(matches!(deadline.check(2), Err(TrustError::TimeBudget { tier: 2, .. })));
    }
}
