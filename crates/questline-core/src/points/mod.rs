//! Points calculation.
//!
//! Provides:
//! - [`calculator::PointsCalculator`] / [`calculator::calculate_task_points`]: the award formula
//! - [`batch`]: multi-task summation and theoretical min/max ranges
//! - [`fairness`]: cross-skill fairness check for equivalent tasks

pub mod batch;
pub mod calculator;
pub mod fairness;

pub use batch::{BatchPointsSummary, PointsRange, TaskSubmission};
pub use calculator::{
    bonus_fraction, calculate_task_points, effort_score, PointsBreakdown, PointsCalculator,
    PointsResult, BONUS_CURVE_ALPHA, OVER_CAP_EFFORT_THRESHOLD, POINTS_SCALE, SCORE_RANGE,
};
pub use fairness::FairnessReport;
