//! Questline Core Library
//!
//! Skill-weighted points calculation for the Questline task platform: the
//! skill configuration registry, the award formula with its cap and over-cap
//! exception, batch and fairness helpers, and the ambient tracing hooks.

pub mod config;
pub mod domain;
pub mod obs;
pub mod points;
pub mod skills;
pub mod telemetry;

pub use config::ScoringConfig;

pub use domain::{
    ConfigError, PointsError, ProofStrength, SkillConfigError, TaskFactors, FACTOR_COUNT,
};

pub use obs::{
    emit_fairness_checked, emit_over_cap_applied, emit_points_calculated, emit_skill_fallback,
};

pub use points::{
    bonus_fraction, calculate_task_points, effort_score, BatchPointsSummary, FairnessReport,
    PointsBreakdown, PointsCalculator, PointsRange, PointsResult, TaskSubmission,
};

pub use skills::{validate_skill_configuration, SkillConfiguration, SkillRegistry};

pub use telemetry::init_tracing;
