// src/config/mod.rs
pub mod types;

pub use self::types::{Config, GraphConfig, IoConfig, LimitsConfig, PolicyConfig, TrustToml};

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::classify::Policy;
use crate::error::{Result, TrustError};
use crate::graph::budget::SAFE_DEPTH;
use crate::graph::{ExpandOptions, ResourceBudget};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "trustnet.toml";

/// Written by `trustnet init`.
pub const DEFAULT_TOML: &str = r#"# trustnet configuration

[graph]
# Degrees of separation to compute. Raising this above 2 needs a [limits] entry.
depth = 2
parallel = true

[limits]
# max_tier_size = 1000000
# max_total_entries = 50000000
# time_budget_secs = 600

[io]
batch = "paymo_input/batch_payment.csv"
stream = "paymo_input/stream_payment.csv"
output_dir = "paymo_output"
chunk_size = 1000000

[[policies]]
name = "output1"
min_tier = 1
max_tier = 1

[[policies]]
name = "output2"
min_tier = 1
max_tier = 2

# No max_tier: the full computed depth.
[[policies]]
name = "output3"
min_tier = 1
"#;

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::from_toml(TrustToml::default())
    }

    fn from_toml(file: TrustToml) -> Self {
        Self {
            graph: file.graph,
            limits: file.limits,
            io: file.io,
            policies: file.policies,
            source: None,
        }
    }

    /// Loads `trustnet.toml` from the working directory, or defaults if absent.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No {CONFIG_FILE} found; using defaults");
            Ok(Self::new())
        }
    }

    /// Loads settings from an explicit file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TrustError::io(e, path))?;
        let mut config = Self::parse_toml(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses TOML text; omitted keys take their defaults.
    ///
    /// # Errors
    /// Returns `Config` on malformed TOML or wrong value types.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let file: TrustToml = toml::from_str(content)?;
        Ok(Self::from_toml(file))
    }

    /// Rejects settings the pipeline cannot run with.
    ///
    /// # Errors
    /// Returns `Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.graph.depth == 0 {
            return Err(invalid("graph.depth must be at least 1"));
        }
        if self.io.chunk_size == 0 {
            return Err(invalid("io.chunk_size must be at least 1"));
        }
        if self.graph.depth > SAFE_DEPTH && !self.budget().is_bounded() {
            return Err(invalid(&format!(
                "graph.depth = {} needs at least one [limits] ceiling \
                 (only depth <= {SAFE_DEPTH} runs unbounded)",
                self.graph.depth
            )));
        }
        if self.policies.is_empty() {
            return Err(invalid("at least one policy is required"));
        }
        self.validate_policies()
    }

    fn validate_policies(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for policy in self.policies() {
            if !seen.insert(policy.name.clone()) {
                return Err(invalid(&format!("duplicate policy name '{}'", policy.name)));
            }
            if policy.min_tier == 0 {
                return Err(invalid(&format!(
                    "policy '{}': min_tier must be at least 1",
                    policy.name
                )));
            }
            if policy.min_tier > policy.max_tier {
                return Err(invalid(&format!(
                    "policy '{}': min_tier {} exceeds max_tier {}",
                    policy.name, policy.min_tier, policy.max_tier
                )));
            }
            if policy.max_tier > self.graph.depth {
                warn!(
                    "Policy '{}' trusts up to tier {} but only {} tiers are computed; \
                     farther users will be unverified",
                    policy.name, policy.max_tier, self.graph.depth
                );
            }
        }
        Ok(())
    }

    /// Policies with open-ended `max_tier` resolved to the graph depth.
    #[must_use]
    pub fn policies(&self) -> Vec<Policy> {
        self.policies
            .iter()
            .map(|p| {
                let max_tier = p.max_tier.unwrap_or(self.graph.depth);
                Policy::new(p.name.clone(), p.min_tier, max_tier)
            })
            .collect()
    }

    #[must_use]
    pub fn budget(&self) -> ResourceBudget {
        ResourceBudget {
            max_tier_size: self.limits.max_tier_size,
            max_total_entries: self.limits.max_total_entries,
            time_budget: self.limits.time_budget_secs.map(Duration::from_secs),
        }
    }

    #[must_use]
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            parallel: self.graph.parallel,
            budget: self.budget(),
        }
    }

    /// Writes the commented default file to `path`.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be written.
    pub fn write_default(path: &Path) -> Result<()> {
        fs::write(path, DEFAULT_TOML).map_err(|e| TrustError::io(e, path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(msg: &str) -> TrustError {
    TrustError::Config(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_matches_defaults() -> Result<()> {
        let parsed = Config::parse_toml(DEFAULT_TOML)?;
        let defaults = Config::new();
        assert_eq!(parsed.graph, defaults.graph);
        assert_eq!(parsed.limits, defaults.limits);
        assert_eq!(parsed.io, defaults.io);
        assert_eq!(parsed.policies, defaults.policies);
        parsed.validate()
    }

    #[test]
    fn test_open_policy_resolves_to_depth() -> Result<()> {
        let mut c = Config::new();
        c.graph.depth = 4;
        c.limits.max_tier_size = Some(10);
        c.validate()?;
        let ps = c.policies();
        assert_eq!(ps[2].max_tier, 4);
        assert_eq!(ps[1].max_tier, 2);
        Ok(())
    }

    #[test]
    fn test_deep_graph_requires_limit() {
        let mut c = Config::new();
        c.graph.depth = 3;
        assert!(matches!(c.validate(), Err(TrustError::Config(_))));
        c.limits.time_budget_secs = Some(60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_inverted_policy_rejected() {
        let mut c = Config::new();
        c.policies = vec![PolicyConfig::new("bad", 2, Some(1))];
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_duplicate_policy_rejected() {
        let mut c = Config::new();
        c.policies.push(PolicyConfig::new("output1", 1, Some(1)));
        assert!(c.validate().is_err());
    }
}
