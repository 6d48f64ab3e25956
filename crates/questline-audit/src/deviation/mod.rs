//! Deviation classification.
//!
//! Provides:
//! - [`types`]: analysis inputs/outputs and the tier, confidence and action enums
//! - [`thresholds::DeviationThresholds`]: per-skill, per-difficulty threshold ladders
//! - [`classifier`]: magnitude, tier and direction of a score pair

pub mod classifier;
pub mod thresholds;
pub mod types;

pub use classifier::{classify_deviation, deviation_magnitude, DeviationClassification};
pub use thresholds::{DeviationThresholds, ThresholdLadder};
pub use types::{
    AnalysisMetadata, AuditAction, Confidence, DeviationAnalysisInput, DeviationAnalysisResult,
    DeviationType, Difficulty, ScoreDirection, SubmissionContext,
};
