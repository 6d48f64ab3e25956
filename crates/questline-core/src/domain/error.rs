//! Domain-level error taxonomy for Questline scoring.

/// Validation failures raised by the points calculator.
///
/// Every variant carries the offending value and the accepted range so the
/// caller can turn it into a user-facing rejection without re-deriving context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointsError {
    #[error("invalid score {value}: must be within [{min}, {max}]")]
    InvalidScore { value: f64, min: f64, max: f64 },

    #[error(
        "invalid task factor '{field}' ({}): must be within [{min}, {max}]",
        display_factor(.value)
    )]
    InvalidFactor {
        field: &'static str,
        value: Option<f64>,
        min: f64,
        max: f64,
    },

    #[error("invalid proof strength {value}: must be one of {allowed:?}")]
    InvalidProofStrength { value: u32, allowed: [u32; 4] },

    #[error("task is required to calculate points")]
    MissingTask,

    #[error("batch item {index}: {source}")]
    BatchItem {
        index: usize,
        #[source]
        source: Box<PointsError>,
    },
}

fn display_factor(value: &Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "missing".to_string(),
    }
}

/// Errors produced when a skill configuration falls outside its invariant ranges.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkillConfigError {
    #[error("skill '{slug}': {field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        slug: String,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("skill '{slug}': weights must be finite, non-negative and sum to a positive value")]
    InvalidWeights { slug: String },

    #[error("duplicate skill slug: {0}")]
    DuplicateSlug(String),

    #[error("skill slug must not be empty")]
    EmptySlug,
}

/// Errors produced by scoring configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("fairness tolerance {0} must be within (0, 1]")]
    FairnessTolerance(f64),
}
