// src/graph/index.rs
//! Compiled distance lookup.
//!
//! A [`DistanceTable`] can only be produced from a fully expanded graph, so
//! every table that exists answers queries for the whole configured depth.

use std::collections::HashMap;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use tracing::info;

use super::social::{SocialGraph, TierMap};
use crate::error::{Result, TrustError};
use crate::types::UserId;

/// Degree of separation between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Distance {
    /// Reached after this many hops.
    Hops(usize),
    /// No relationship within the computed depth, or an unknown source.
    Unknown,
}

impl Distance {
    #[must_use]
    pub fn hops(self) -> Option<usize> {
        match self {
            Self::Hops(n) => Some(n),
            Self::Unknown => None,
        }
    }
}

/// Flattened tier map of one user: reachable id to hop count.
#[derive(Debug, Clone, Default)]
pub struct DistanceIndex {
    hops: HashMap<UserId, u32>,
}

impl DistanceIndex {
    fn flatten(map: &TierMap, graph: &SocialGraph) -> Self {
        let hops = map
            .entries()
            .filter_map(|(tier, slot)| {
                let hops = u32::try_from(tier).ok()?;
                graph.user(slot).map(|user| (user, hops))
            })
            .collect();
        Self { hops }
    }

    #[must_use]
    pub fn lookup(&self, target: UserId) -> Distance {
        self.hops
            .get(&target)
            .map_or(Distance::Unknown, |&h| Distance::Hops(h as usize))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

impl SocialGraph {
    /// Compiles the distance index of a single user.
    ///
    /// Returns `Ok(None)` for users that are not in the graph.
    ///
    /// # Errors
    /// Returns `IndexNotReady` if the graph has not reached its configured depth.
    pub fn compile_index(&self, user: UserId) -> Result<Option<DistanceIndex>> {
        self.ensure_expanded()?;
        Ok(self
            .tier_map(user)
            .map(|map| DistanceIndex::flatten(map, self)))
    }

    fn ensure_expanded(&self) -> Result<()> {
        if self.completed_depth() < self.depth() {
            return Err(TrustError::IndexNotReady {
                completed: self.completed_depth(),
                depth: self.depth(),
            });
        }
        Ok(())
    }
}

/// Distance indices for every user in the graph.
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    indices: HashMap<UserId, DistanceIndex>,
    depth: usize,
}

impl DistanceTable {
    /// Flattens every tier map of a fully expanded graph.
    ///
    /// # Errors
    /// Returns `IndexNotReady` if expansion stopped short of the configured depth.
    pub fn compile(graph: &SocialGraph, parallel: bool) -> Result<Self> {
        graph.ensure_expanded()?;
        let users: Vec<UserId> = graph.users().collect();
        let build = |user: &UserId| {
            graph
                .tier_map(*user)
                .map(|map| (*user, DistanceIndex::flatten(map, graph)))
        };
        let indices: HashMap<UserId, DistanceIndex> = if parallel {
            users.par_iter().filter_map(build).collect()
        } else {
            users.iter().filter_map(build).collect()
        };
        info!("Compiled distance indices for {} users", indices.len());
        Ok(Self {
            indices,
            depth: graph.depth(),
        })
    }

    /// Degree of separation from `source` to `target`.
    #[must_use]
    pub fn lookup(&self, source: UserId, target: UserId) -> Distance {
        self.indices
            .get(&source)
            .map_or(Distance::Unknown, |index| index.lookup(target))
    }

    #[must_use]
    pub fn index(&self, user: UserId) -> Option<&DistanceIndex> {
        self.indices.get(&user)
    }

    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.indices.contains_key(&user)
    }

    /// Depth the underlying graph was expanded to.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::budget::ExpandOptions;

    fn expanded() -> Result<SocialGraph> {
        let mut g = SocialGraph::new(2);
        g.add_edge(UserId(1), UserId(2))?;
        g.add_edge(UserId(2), UserId(3))?;
        g.expand_all(&ExpandOptions::sequential())?;
        Ok(g)
    }

    #[test]
    fn test_lookup_hops_and_unknown() -> Result<()> {
        let table = DistanceTable::compile(&expanded()?, false)?;
        assert_eq!(table.lookup(UserId(1), UserId(2)), Distance::Hops(1));
        assert_eq!(table.lookup(UserId(1), UserId(3)), Distance::Hops(2));
        assert_eq!(table.lookup(UserId(1), UserId(1)), Distance::Unknown);
        assert_eq!(table.lookup(UserId(999), UserId(1)), Distance::Unknown);
        assert_eq!(table.depth(), 2);
        Ok(())
    }

    #[test]
    fn test_compile_before_expansion_fails() -> Result<()> {
        let mut g = SocialGraph::new(3);
        g.add_edge(UserId(1), UserId(2))?;
        assert!(matches!(
            DistanceTable::compile(&g, false),
            Err(TrustError::IndexNotReady { completed: 1, depth: 3 })
        ));
        assert!(g.compile_index(UserId(1)).is_err());
        Ok(())
    }

    #[test]
    fn test_single_index_matches_table() -> Result<()> {
        let g = expanded()?;
        let table = DistanceTable::compile(&g, true)?;
        let single = g.compile_index(UserId(3))?.unwrap_or_default();
        assert_eq!(single.len(), 2);
        assert_eq!(single.lookup(UserId(1)), table.lookup(UserId(3), UserId(1)));
        assert!(g.compile_index(UserId(42))?.is_none());
        Ok(())
    }
}
