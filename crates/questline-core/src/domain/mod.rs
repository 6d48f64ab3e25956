//! Domain models for Questline scoring.
//!
//! Canonical definitions for the scoring inputs:
//! - `TaskFactors`: normalized effort factors of a catalog task
//! - `ProofStrength`: discrete verifiability level of a submission
//! - the error taxonomy shared by the scoring layer

pub mod error;
pub mod task;

pub use error::{ConfigError, PointsError, SkillConfigError};
pub use task::{ProofStrength, TaskFactors, FACTOR_COUNT};
