// src/graph/social.rs
//! Node arena and per-user tier maps.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Result, TrustError};
use crate::types::{NodeIdx, UserId};

/// Users first reached at each degree of separation from one owner.
///
/// `tiers[k - 1]` holds tier `k` as a sorted, deduplicated list of arena slots.
#[derive(Debug, Clone, Default)]
pub struct TierMap {
    tiers: Vec<Vec<NodeIdx>>,
}

impl TierMap {
    /// Slots in tier `k`; empty for tier 0 or tiers not yet expanded.
    #[must_use]
    pub fn tier(&self, k: usize) -> &[NodeIdx] {
        k.checked_sub(1)
            .and_then(|i| self.tiers.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of tiers stored, including empty ones.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tiers.len()
    }

    /// The tier `slot` was assigned to, if any.
    #[must_use]
    pub fn tier_of(&self, slot: NodeIdx) -> Option<usize> {
        self.tiers
            .iter()
            .position(|tier| tier.binary_search(&slot).is_ok())
            .map(|i| i + 1)
    }

    /// Total entries over all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(tier, slot)` for every stored entry.
    pub fn entries(&self) -> impl Iterator<Item = (usize, NodeIdx)> + '_ {
        self.tiers
            .iter()
            .enumerate()
            .flat_map(|(i, tier)| tier.iter().map(move |&slot| (i + 1, slot)))
    }

    fn insert_direct(&mut self, slot: NodeIdx) {
        if self.tiers.is_empty() {
            self.tiers.push(Vec::new());
        }
        if let Some(direct) = self.tiers.first_mut() {
            if let Err(pos) = direct.binary_search(&slot) {
                direct.insert(pos, slot);
            }
        }
    }

    pub(crate) fn push_tier(&mut self, tier: Vec<NodeIdx>) {
        self.tiers.push(tier);
    }
}

/// Aggregate counts for reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub self_edges: usize,
    pub depth: usize,
    pub completed_depth: usize,
    /// Entry totals per tier, index 0 being tier 1.
    pub tier_entries: Vec<usize>,
}

/// Undirected, unweighted transaction graph stored as a node arena.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    ids: Vec<UserId>,
    slots: HashMap<UserId, NodeIdx>,
    pub(crate) maps: Vec<TierMap>,
    depth: usize,
    pub(crate) completed: usize,
}

impl SocialGraph {
    /// Creates an empty graph that will be expanded up to `depth` tiers.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            ids: Vec::new(),
            slots: HashMap::new(),
            maps: Vec::new(),
            depth,
            completed: 1,
        }
    }

    /// Records that `a` and `b` transacted. Repeated calls are no-ops.
    ///
    /// # Errors
    /// Returns `GraphSealed` once tier expansion has started, or `GraphTooLarge`
    /// if the arena runs out of slots.
    pub fn add_edge(&mut self, a: UserId, b: UserId) -> Result<()> {
        if self.completed > 1 {
            return Err(TrustError::GraphSealed { a, b });
        }
        let slot_a = self.intern(a)?;
        let slot_b = self.intern(b)?;
        self.map_mut(slot_a).insert_direct(slot_b);
        self.map_mut(slot_b).insert_direct(slot_a);
        Ok(())
    }

    fn intern(&mut self, user: UserId) -> Result<NodeIdx> {
        if let Some(&slot) = self.slots.get(&user) {
            return Ok(slot);
        }
        let slot = NodeIdx::try_from(self.ids.len()).map_err(|_| TrustError::GraphTooLarge {
            tier: 1,
            total: self.ids.len(),
            limit: NodeIdx::MAX as usize,
        })?;
        self.ids.push(user);
        self.slots.insert(user, slot);
        self.maps.push(TierMap::default());
        Ok(slot)
    }

    #[allow(clippy::indexing_slicing)] // Guarded: slots are only minted by intern()
    fn map_mut(&mut self, slot: NodeIdx) -> &mut TierMap {
        &mut self.maps[slot as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Configured expansion depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Highest tier completed for every node (1 right after construction).
    #[must_use]
    pub fn completed_depth(&self) -> usize {
        self.completed
    }

    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.slots.contains_key(&user)
    }

    #[must_use]
    pub fn slot(&self, user: UserId) -> Option<NodeIdx> {
        self.slots.get(&user).copied()
    }

    #[must_use]
    pub fn user(&self, slot: NodeIdx) -> Option<UserId> {
        self.ids.get(slot as usize).copied()
    }

    /// All users in insertion order.
    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.ids.iter().copied()
    }

    #[must_use]
    pub fn tier_map(&self, user: UserId) -> Option<&TierMap> {
        self.slot(user).and_then(|slot| self.maps.get(slot as usize))
    }

    /// Users in tier `k` of `user`, sorted by id. Empty for unknown users.
    #[must_use]
    pub fn tier(&self, user: UserId, k: usize) -> Vec<UserId> {
        let Some(map) = self.tier_map(user) else {
            return Vec::new();
        };
        let mut out: Vec<UserId> = map.tier(k).iter().filter_map(|&s| self.user(s)).collect();
        out.sort_unstable();
        out
    }

    /// Degree of separation from `from` to `to` within the expanded tiers.
    #[must_use]
    pub fn tier_of(&self, from: UserId, to: UserId) -> Option<usize> {
        let slot = self.slot(to)?;
        self.tier_map(from)?.tier_of(slot)
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let self_edges = self
            .maps
            .iter()
            .enumerate()
            .filter(|(i, map)| {
                NodeIdx::try_from(*i).is_ok_and(|slot| map.tier(1).binary_search(&slot).is_ok())
            })
            .count();
        let direct: usize = self.maps.iter().map(|m| m.tier(1).len()).sum();
        let tier_entries = (1..=self.completed)
            .map(|k| self.maps.iter().map(|m| m.tier(k).len()).sum::<usize>())
            .collect();

        GraphStats {
            nodes: self.ids.len(),
            edges: (direct + self_edges) / 2,
            self_edges,
            depth: self.depth,
            completed_depth: self.completed,
            tier_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> UserId {
        UserId(n)
    }

    #[test]
    fn test_add_edge_is_symmetric() -> Result<()> {
        let mut g = SocialGraph::new(2);
        g.add_edge(id(1), id(2))?;
        assert_eq!(g.tier(id(1), 1), vec![id(2)]);
        assert_eq!(g.tier(id(2), 1), vec![id(1)]);
        Ok(())
    }

    #[test]
    fn test_self_edge_recorded_once() -> Result<()> {
        let mut g = SocialGraph::new(2);
        g.add_edge(id(7), id(7))?;
        g.add_edge(id(7), id(7))?;
        assert_eq!(g.len(), 1);
        assert_eq!(g.tier(id(7), 1), vec![id(7)]);
        let stats = g.stats();
        assert_eq!(stats.self_edges, 1);
        assert_eq!(stats.edges, 1);
        Ok(())
    }

    #[test]
    fn test_stats_counts_undirected_edges() -> Result<()> {
        let mut g = SocialGraph::new(2);
        g.add_edge(id(1), id(2))?;
        g.add_edge(id(2), id(1))?;
        g.add_edge(id(2), id(3))?;
        let stats = g.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.tier_entries, vec![4]);
        Ok(())
    }

    #[test]
    fn test_tier_map_bounds() {
        let map = TierMap::default();
        assert!(map.tier(0).is_empty());
        assert!(map.tier(5).is_empty());
        assert_eq!(map.tier_of(3), None);
    }
}
