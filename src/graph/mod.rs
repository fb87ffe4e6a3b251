// src/graph/mod.rs
//! The payer social graph: construction, tier expansion and distance lookup.

pub mod budget;
pub mod extract;
pub mod index;
pub mod social;
pub mod tiers;

pub use budget::{ExpandOptions, ResourceBudget};
pub use extract::{extract_into, ExtractStats};
pub use index::{Distance, DistanceIndex, DistanceTable};
pub use social::{GraphStats, SocialGraph, TierMap};
pub use tiers::TierStats;
