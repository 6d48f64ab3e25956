//! Magnitude-based deviation classification.

use serde::{Deserialize, Serialize};

use super::thresholds::DeviationThresholds;
use super::types::{DeviationType, Difficulty, ScoreDirection};

/// Absolute difference between a user score and an audit score.
pub fn deviation_magnitude(user_score: f64, audit_score: f64) -> f64 {
    (user_score - audit_score).abs()
}

/// Classify a magnitude against the built-in threshold tables.
pub fn classify_deviation(
    skill_area: &str,
    difficulty: Difficulty,
    magnitude: f64,
) -> DeviationType {
    DeviationThresholds::global().classify(skill_area, difficulty, magnitude)
}

/// Magnitude, tier and direction of one score pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationClassification {
    pub magnitude: f64,
    pub deviation_type: DeviationType,
    pub direction: ScoreDirection,
}

impl DeviationClassification {
    pub fn compute(
        thresholds: &DeviationThresholds,
        skill_area: &str,
        difficulty: Difficulty,
        user_score: f64,
        audit_score: f64,
    ) -> Self {
        let magnitude = deviation_magnitude(user_score, audit_score);
        Self {
            magnitude,
            deviation_type: thresholds.classify(skill_area, difficulty, magnitude),
            direction: ScoreDirection::of(user_score, audit_score),
        }
    }
}
