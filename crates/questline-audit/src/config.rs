//! Deviation analyzer configuration.

use serde::{Deserialize, Serialize};

use questline_core::ConfigError;

pub const NARRATIVE_TIMEOUT_ENV: &str = "QUESTLINE_NARRATIVE_TIMEOUT_MS";
pub const NARRATIVE_RETRIES_ENV: &str = "QUESTLINE_NARRATIVE_RETRIES";
pub const BATCH_CONCURRENCY_ENV: &str = "QUESTLINE_BATCH_CONCURRENCY";

/// Upper bound on narrative retries; one retry at most.
pub const MAX_NARRATIVE_RETRIES: u32 = 1;

/// Runtime configuration for deviation analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConfig {
    /// Wall-clock limit for a single narrative generation attempt (milliseconds).
    pub narrative_timeout_ms: u64,
    /// Retries after a failed attempt, clamped to [`MAX_NARRATIVE_RETRIES`].
    pub narrative_retries: u32,
    /// Maximum analyses in flight during a batch.
    pub batch_concurrency: usize,
    /// Prompt excerpt limits, in characters.
    pub code_excerpt_chars: usize,
    pub proof_excerpt_chars: usize,
    pub description_excerpt_chars: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            narrative_timeout_ms: 10_000,
            narrative_retries: 0,
            batch_concurrency: 8,
            code_excerpt_chars: 1_500,
            proof_excerpt_chars: 800,
            description_excerpt_chars: 500,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

impl AnalyzerConfig {
    /// Load from the environment, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = parse_env(NARRATIVE_TIMEOUT_ENV)? {
            config.narrative_timeout_ms = ms;
        }
        if let Some(retries) = parse_env(NARRATIVE_RETRIES_ENV)? {
            config.narrative_retries = retries;
        }
        if let Some(workers) = parse_env(BATCH_CONCURRENCY_ENV)? {
            config.batch_concurrency = workers;
        }
        Ok(config.normalized())
    }

    /// Clamp fields into their usable ranges.
    pub fn normalized(mut self) -> Self {
        self.narrative_retries = self.narrative_retries.min(MAX_NARRATIVE_RETRIES);
        self.batch_concurrency = self.batch_concurrency.max(1);
        self.narrative_timeout_ms = self.narrative_timeout_ms.max(1);
        self
    }

    pub fn with_narrative_timeout_ms(mut self, ms: u64) -> Self {
        self.narrative_timeout_ms = ms;
        self
    }

    pub fn with_narrative_retries(mut self, retries: u32) -> Self {
        self.narrative_retries = retries;
        self
    }

    pub fn with_batch_concurrency(mut self, workers: usize) -> Self {
        self.batch_concurrency = workers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.narrative_timeout_ms, 10_000);
        assert_eq!(cfg.narrative_retries, 0);
        assert_eq!(cfg.batch_concurrency, 8);
    }

    #[test]
    fn test_normalized_clamps_retries_and_workers() {
        let cfg = AnalyzerConfig::default()
            .with_narrative_retries(5)
            .with_batch_concurrency(0)
            .normalized();
        assert_eq!(cfg.narrative_retries, MAX_NARRATIVE_RETRIES);
        assert_eq!(cfg.batch_concurrency, 1);
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: AnalyzerConfig = serde_json::from_str(r#"{"narrativeTimeoutMs":250}"#).unwrap();
        assert_eq!(cfg.narrative_timeout_ms, 250);
        assert_eq!(cfg.proof_excerpt_chars, 800);
    }
}
