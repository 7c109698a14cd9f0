//! Configuration for a pattern-matching pass.
//!
//! The engine itself has no knobs: it enumerates every embedding in
//! depth-first order. What a caller can tune is how much of that sequence
//! they want to see:
//! - limit: stop after this many matches (a caller-side deadline expressed
//!   as a bound on the number of pulls);
//! - dedupe: drop matches whose node bindings were already yielded.
//!
//! Quick examples
//!
//! ```
//! use graphmatch_common::{Config, Dedupe};
//! let cfg = Config::builder().limit(10).dedupe(Dedupe::Nodes).build();
//! assert_eq!(cfg.limit, Some(10));
//! ```

use serde::{Deserialize, Serialize};

/// Global search configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of matches yielded by one matcher iterator.
    #[serde(default)]
    pub limit: Option<usize>,
    /// How to deduplicate matches.
    #[serde(default)]
    pub dedupe: Dedupe,
}

impl Config {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Control how matches are deduplicated.
///
/// - None:
///   Every embedding is yielded. Two matches differ if any pattern
///   relationship is bound to a different graph relationship.
/// - Nodes:
///   Ignore relationship bindings. A match is dropped if the same pattern
///   node → graph node assignment was already yielded (collapses parallel
///   relationships between the same nodes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dedupe {
    /// Yield every embedding.
    #[default]
    None,
    /// Yield one match per distinct node assignment.
    Nodes,
}

impl Dedupe {
    /// Whether any deduplication is requested.
    pub const fn enabled(self) -> bool {
        !matches!(self, Dedupe::None)
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Yield at most `limit` matches.
    pub const fn limit(mut self, limit: usize) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Yield every match.
    pub const fn unlimited(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Select the dedupe mode.
    pub const fn dedupe(mut self, dedupe: Dedupe) -> Self {
        self.config.dedupe = dedupe;
        self
    }

    /// Finish building.
    pub fn build(self) -> Config {
        self.config
    }
}
