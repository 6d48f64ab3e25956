//! Scoring policy configuration.

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// Environment variable overriding [`ScoringConfig::fairness_tolerance`].
pub const FAIRNESS_TOLERANCE_ENV: &str = "QUESTLINE_FAIRNESS_TOLERANCE";

/// Tunable scoring policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringConfig {
    /// Cross-skill spread, as a fraction of the mean award, above which
    /// equivalent tasks are reported as unfairly scored.
    pub fairness_tolerance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            fairness_tolerance: 0.20,
        }
    }
}

impl ScoringConfig {
    /// Load from the environment, keeping defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(FAIRNESS_TOLERANCE_ENV) {
            config.fairness_tolerance =
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: FAIRNESS_TOLERANCE_ENV.to_string(),
                        value: raw.clone(),
                    })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject tolerances outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.fairness_tolerance;
        if t.is_finite() && t > 0.0 && t <= 1.0 {
            Ok(())
        } else {
            Err(ConfigError::FairnessTolerance(t))
        }
    }

    /// Override the fairness tolerance.
    pub fn with_fairness_tolerance(mut self, tolerance: f64) -> Self {
        self.fairness_tolerance = tolerance;
        self
    }
}
