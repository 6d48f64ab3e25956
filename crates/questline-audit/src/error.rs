//! Error types for the audit layer.
//!
//! Deviation analysis never surfaces these to its callers; they cover table
//! construction, override bookkeeping, run lifecycle and artifact I/O.

use thiserror::Error;

use crate::deviation::Difficulty;

/// Errors produced by the audit layer.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A threshold ladder is not strictly ascending or holds a non-finite bound.
    #[error("invalid thresholds for {skill_area}/{difficulty}: {reason}")]
    InvalidThresholds {
        skill_area: String,
        difficulty: Difficulty,
        reason: String,
    },

    /// The default ladder table lacks an entry for a difficulty.
    #[error("default thresholds missing for difficulty {0}")]
    MissingDefaultLadder(Difficulty),

    /// An override entry failed validation.
    #[error("invalid override entry: {0}")]
    InvalidOverride(String),

    /// Results were added to, or completion requested for, a finished run.
    #[error("audit run {0} is already completed")]
    RunAlreadyCompleted(uuid::Uuid),

    /// An exported artifact no longer matches its recorded digest.
    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("configuration error: {0}")]
    Config(#[from] questline_core::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
