//! Analysis settings: slot count, scoring weights and top-N size.
//!
//! Values come from, in order of precedence, command-line flags, `RATER_*`
//! environment variables (a `.env` file is honored by the binary), an
//! optional JSON file, and finally the built-in defaults:
//!
//! ```json
//! {
//!   "slot_count": 6,
//!   "weights": { "per_minute_penalty": 3, "per_stop_penalty": 250, "direct_bonus": 50 },
//!   "top_n": 15
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::analyzers::scoring::ScoringWeights;
use crate::error::{RaterError, Result};

pub const ENV_SLOT_COUNT: &str = "RATER_SLOT_COUNT";
pub const ENV_PER_MINUTE_PENALTY: &str = "RATER_PER_MINUTE_PENALTY";
pub const ENV_PER_STOP_PENALTY: &str = "RATER_PER_STOP_PENALTY";
pub const ENV_DIRECT_BONUS: &str = "RATER_DIRECT_BONUS";
pub const ENV_TOP_N: &str = "RATER_TOP_N";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of equal time-of-day buckets; always at least 1.
    pub slot_count: usize,
    pub weights: ScoringWeights,
    pub top_n: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            per_minute_penalty: 3,
            per_stop_penalty: 250,
            direct_bonus: 50,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            slot_count: 6,
            weights: ScoringWeights::default(),
            top_n: 15,
        }
    }
}

impl AnalysisConfig {
    /// Loads a JSON config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RaterError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|source| {
            RaterError::ConfigFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config.normalized())
    }

    /// Applies `RATER_*` environment variables on top of `self`.
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Blank values are
    /// ignored; unparsable values are an error.
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let int = |key: &str| -> Result<Option<i64>> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => value
                    .trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| RaterError::InvalidConfig {
                        key: key.to_string(),
                        value,
                    }),
                _ => Ok(None),
            }
        };

        if let Some(v) = int(ENV_SLOT_COUNT)? {
            self.slot_count = clamp_count(v);
        }
        if let Some(v) = int(ENV_PER_MINUTE_PENALTY)? {
            self.weights.per_minute_penalty = v;
        }
        if let Some(v) = int(ENV_PER_STOP_PENALTY)? {
            self.weights.per_stop_penalty = v;
        }
        if let Some(v) = int(ENV_DIRECT_BONUS)? {
            self.weights.direct_bonus = v;
        }
        if let Some(v) = int(ENV_TOP_N)? {
            self.top_n = clamp_count(v);
        }

        debug!(config = ?self, "Configuration resolved");
        Ok(self.normalized())
    }

    fn normalized(mut self) -> Self {
        self.slot_count = self.slot_count.max(1);
        self
    }
}

/// Negative counts read as 0.
fn clamp_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}
