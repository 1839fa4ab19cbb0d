use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RESULT_COUNT: usize = 5;
pub const DEFAULT_RELEVANCE_EPSILON: f64 = 1e-6;
pub const DEFAULT_SHARD_COUNT: usize = 64;

/// Tunables of a [`SearchServer`](crate::SearchServer), fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on the number of hits returned by a single query.
    pub max_result_count: usize,
    /// Two relevances closer than this are ordered by rating instead.
    pub relevance_epsilon: f64,
    /// Number of independently locked shards used by the parallel tier.
    pub shard_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_result_count: DEFAULT_MAX_RESULT_COUNT,
            relevance_epsilon: DEFAULT_RELEVANCE_EPSILON,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_result_count == 0 {
            return Err(Error::InvalidConfig("max_result_count must be positive".into()));
        }
        if self.shard_count == 0 {
            return Err(Error::InvalidConfig("shard_count must be positive".into()));
        }
        if !self.relevance_epsilon.is_finite() || self.relevance_epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "relevance_epsilon must be a non-negative finite number, got {}",
                self.relevance_epsilon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_result_count, 5);
        assert_eq!(config.shard_count, 64);
    }

    #[test]
    fn rejects_degenerate_values() {
        let zero_results = SearchConfig { max_result_count: 0, ..SearchConfig::default() };
        assert!(matches!(zero_results.validate(), Err(Error::InvalidConfig(_))));

        let zero_shards = SearchConfig { shard_count: 0, ..SearchConfig::default() };
        assert!(matches!(zero_shards.validate(), Err(Error::InvalidConfig(_))));

        let bad_epsilon = SearchConfig { relevance_epsilon: f64::NAN, ..SearchConfig::default() };
        assert!(matches!(bad_epsilon.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"shard_count": 8}"#).unwrap();
        assert_eq!(config.shard_count, 8);
        assert_eq!(config.max_result_count, DEFAULT_MAX_RESULT_COUNT);
    }
}
