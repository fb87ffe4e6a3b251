// src/graph/tiers.rs
//! Breadth-first tier expansion.
//!
//! Tier `k` of a user is the union of the direct contacts of everyone in
//! tier `k - 1`, minus the user and everyone already placed in tiers
//! `1..k`. Each pass reads only completed tiers, so nodes within one pass
//! are independent and can be expanded on the rayon pool. Results for the
//! whole pass are collected before any node is written.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use tracing::{debug, info};

use super::budget::{Deadline, ExpandOptions};
use super::social::{SocialGraph, TierMap};
use crate::error::{Result, TrustError};
use crate::types::{NodeIdx, UserId};

/// Outcome of one expansion pass.
#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub tier: usize,
    /// Entries added across all users.
    pub entries: usize,
    /// Users that gained at least one entry.
    pub users_reached: usize,
    pub largest: usize,
    pub duration_ms: u128,
}

impl SocialGraph {
    /// Expands every user to tier `k`.
    ///
    /// Re-running a completed tier is a no-op.
    ///
    /// # Errors
    /// Returns `TierOutOfOrder` when `k < 2`, `k` skips a tier, or `k` is beyond
    /// the configured depth; resource errors when a ceiling is crossed.
    pub fn expand_tier(&mut self, k: usize, opts: &ExpandOptions) -> Result<TierStats> {
        let deadline = opts.budget.deadline(Instant::now());
        self.expand_tier_within(k, opts, deadline)
    }

    /// Expands tiers `2..=depth()` in order, with a barrier between tiers.
    ///
    /// # Errors
    /// Propagates the first misuse or resource error.
    pub fn expand_all(&mut self, opts: &ExpandOptions) -> Result<Vec<TierStats>> {
        let deadline = opts.budget.deadline(Instant::now());
        (2..=self.depth())
            .map(|k| self.expand_tier_within(k, opts, deadline))
            .collect()
    }

    fn expand_tier_within(
        &mut self,
        k: usize,
        opts: &ExpandOptions,
        deadline: Deadline,
    ) -> Result<TierStats> {
        if k < 2 || k > self.completed + 1 || k > self.depth() {
            return Err(TrustError::TierOutOfOrder {
                requested: k,
                completed: self.completed,
            });
        }
        if k <= self.completed {
            debug!("Tier {k} already expanded; skipping");
            return Ok(self.existing_stats(k));
        }

        info!("Building connections of degree {k} for {} users...", self.len());
        let started = Instant::now();
        let next = self.compute_tier(k, opts, deadline)?;
        let added: usize = next.iter().map(Vec::len).sum();

        let stats = TierStats {
            tier: k,
            entries: added,
            users_reached: next.iter().filter(|t| !t.is_empty()).count(),
            largest: next.iter().map(Vec::len).max().unwrap_or(0),
            duration_ms: started.elapsed().as_millis(),
        };
        for (map, tier) in self.maps.iter_mut().zip(next) {
            map.push_tier(tier);
        }
        self.completed = k;

        info!(
            "Tier {k}: {} entries for {} users in {} ms",
            stats.entries, stats.users_reached, stats.duration_ms
        );
        Ok(stats)
    }

    /// Computes tier `k` for every node without touching graph state.
    ///
    /// Entries are claimed against the graph-wide total as each node finishes,
    /// so the first node to cross a ceiling stops the pass.
    fn compute_tier(
        &self,
        k: usize,
        opts: &ExpandOptions,
        deadline: Deadline,
    ) -> Result<Vec<Vec<NodeIdx>>> {
        let count = NodeIdx::try_from(self.len()).map_err(|_| TrustError::GraphTooLarge {
            tier: k,
            total: self.len(),
            limit: NodeIdx::MAX as usize,
        })?;
        let budget = &opts.budget;
        let claimed = AtomicUsize::new(self.maps.iter().map(TierMap::len).sum());
        let expand = |slot: NodeIdx| -> Result<Vec<NodeIdx>> {
            deadline.check(k)?;
            let cap = budget.tier_cap(claimed.load(Ordering::Relaxed));
            let tier = self.next_tier(slot, k, cap);
            let user = self.user(slot).unwrap_or(UserId(0));
            budget.check_tier(k, user, tier.len())?;
            let total = claimed.fetch_add(tier.len(), Ordering::Relaxed) + tier.len();
            budget.check_total(k, total)?;
            Ok(tier)
        };

        if opts.parallel {
            (0..count).into_par_iter().map(expand).collect()
        } else {
            (0..count).map(expand).collect()
        }
    }

    /// Tier `k` of `slot`. With a `cap`, gathering stops as soon as more than
    /// `cap` distinct users are known, and the partial tier is returned.
    #[allow(clippy::indexing_slicing)] // Guarded: every stored slot indexes into maps
    fn next_tier(&self, slot: NodeIdx, k: usize, cap: Option<usize>) -> Vec<NodeIdx> {
        let own = &self.maps[slot as usize];
        let mut reached: Vec<NodeIdx> = Vec::new();
        let mut compact_at = cap.map_or(usize::MAX, |c| c.saturating_add(1));
        for &via in own.tier(k - 1) {
            reached.extend_from_slice(self.maps[via as usize].tier(1));
            if reached.len() >= compact_at {
                keep_unplaced(&mut reached, slot, own);
                if cap.is_some_and(|c| reached.len() > c) {
                    return reached;
                }
                compact_at = compact_at.max(reached.len().saturating_mul(2));
            }
        }
        keep_unplaced(&mut reached, slot, own);
        reached
    }

    fn existing_stats(&self, k: usize) -> TierStats {
        let sizes = self.maps.iter().map(|m| m.tier(k).len());
        TierStats {
            tier: k,
            entries: sizes.clone().sum(),
            users_reached: sizes.clone().filter(|&n| n > 0).count(),
            largest: sizes.max().unwrap_or(0),
            duration_ms: 0,
        }
    }
}

/// Sorts and dedups `reached`, dropping the owner and anyone in an earlier tier.
fn keep_unplaced(reached: &mut Vec<NodeIdx>, slot: NodeIdx, own: &TierMap) {
    reached.sort_unstable();
    reached.dedup();
    reached.retain(|&other| other != slot && own.tier_of(other).is_none());
}
