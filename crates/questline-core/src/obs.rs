//! Structured observability hooks for points calculation.
//!
//! Events carry an `event` field naming the lifecycle step. Verbosity follows
//! `RUST_LOG`; see [`crate::telemetry::init_tracing`] for subscriber setup.

use tracing::{debug, info};

/// Emit event: a skill area matched no configuration and fell back.
pub fn emit_skill_fallback(skill_area: &str, fallback_slug: &str) {
    debug!(
        event = "skill.fallback",
        skill_area = %skill_area,
        fallback = %fallback_slug,
    );
}

/// Emit event: an award was computed for a task.
pub fn emit_points_calculated(task_id: &str, skill_slug: &str, effort: f64, points: u32) {
    info!(
        event = "points.calculated",
        task_id = %task_id,
        skill = %skill_slug,
        effort = effort,
        points = points,
    );
}

/// Emit event: the over-cap exception replaced the cap.
pub fn emit_over_cap_applied(task_id: &str, cap: u32, boost: u32) {
    info!(
        event = "points.over_cap",
        task_id = %task_id,
        cap = cap,
        boost = boost,
        awarded = cap + boost,
    );
}

/// Emit event: a cross-skill fairness check completed.
pub fn emit_fairness_checked(skills: usize, mean: f64, variance: f64, is_fair: bool) {
    info!(
        event = "points.fairness_checked",
        skills = skills,
        mean = mean,
        variance = variance,
        is_fair = is_fair,
    );
}
