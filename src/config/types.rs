// src/config/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            depth: default_depth(),
            parallel: true,
        }
    }
}

/// Expansion ceilings. Absent keys disable the corresponding limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default)]
    pub max_tier_size: Option<usize>,
    #[serde(default)]
    pub max_total_entries: Option<usize>,
    #[serde(default)]
    pub time_budget_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoConfig {
    #[serde(default = "default_batch")]
    pub batch: PathBuf,
    #[serde(default = "default_stream")]
    pub stream: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            batch: default_batch(),
            stream: default_stream(),
            output_dir: default_output_dir(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// One `[[policies]]` entry. A missing `max_tier` means the full graph depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub name: String,
    #[serde(default = "default_min_tier")]
    pub min_tier: usize,
    #[serde(default)]
    pub max_tier: Option<usize>,
}

impl PolicyConfig {
    #[must_use]
    pub fn new(name: &str, min_tier: usize, max_tier: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            min_tier,
            max_tier,
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_depth() -> usize {
    2
}

const fn default_min_tier() -> usize {
    1
}

const fn default_chunk_size() -> usize {
    1_000_000
}

fn default_batch() -> PathBuf {
    PathBuf::from("paymo_input/batch_payment.csv")
}

fn default_stream() -> PathBuf {
    PathBuf::from("paymo_input/stream_payment.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("paymo_output")
}

pub(crate) fn default_policies() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig::new("output1", 1, Some(1)),
        PolicyConfig::new("output2", 1, Some(2)),
        PolicyConfig::new("output3", 1, None),
    ]
}

/// On-disk shape of `trustnet.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustToml {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub io: IoConfig,
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyConfig>,
}

impl Default for TrustToml {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            limits: LimitsConfig::default(),
            io: IoConfig::default(),
            policies: default_policies(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub graph: GraphConfig,
    pub limits: LimitsConfig,
    pub io: IoConfig,
    pub policies: Vec<PolicyConfig>,
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
}
