//! Structured observability hooks for the audit pipeline.
//!
//! Events are emitted with an `event` field naming the step; narrative
//! fallbacks are logged at `warn!` so degraded analyses stand out.

use tracing::{info, warn, Span};

/// Submission-scoped span tagged with the task title and skill area.
///
/// Attach it to async work with `tracing::Instrument::instrument`; an entered
/// guard must not be held across `.await`.
pub fn audit_span(task_title: &str, skill_area: &str) -> Span {
    tracing::info_span!(
        "questline.audit",
        task_title = %task_title,
        skill_area = %skill_area,
    )
}

/// Emit event: a deviation analysis finished.
pub fn emit_deviation_analyzed(
    task_title: &str,
    deviation_type: &str,
    magnitude: f64,
    model_used: &str,
    processing_time_ms: u64,
) {
    info!(
        event = "deviation.analyzed",
        task_title = %task_title,
        deviation_type = %deviation_type,
        magnitude = magnitude,
        model_used = %model_used,
        processing_time_ms = processing_time_ms,
    );
}

/// Emit event: narrative generation failed and the template was used.
pub fn emit_narrative_fallback(task_title: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "deviation.narrative_fallback", task_title = %task_title, reason = %reason);
}

/// Emit event: a batch of analyses completed.
pub fn emit_batch_completed(requested: usize, analyzed: usize, critical: usize, cancelled: bool) {
    info!(
        event = "deviation.batch_completed",
        requested = requested,
        analyzed = analyzed,
        critical = critical,
        cancelled = cancelled,
    );
}

/// Emit event: a reviewer override was appended to the trail.
pub fn emit_override_recorded(submission_id: &str, reviewer: &str, action: &str) {
    info!(
        event = "override.recorded",
        submission_id = %submission_id,
        reviewer = %reviewer,
        action = %action,
    );
}

/// Emit event: health metrics computed for a set of audit results.
pub fn emit_audit_metrics(total: usize, average_deviation: f64, status: &str, health_score: f64) {
    info!(
        event = "audit.metrics_computed",
        total = total,
        average_deviation = average_deviation,
        status = %status,
        health_score = health_score,
    );
}

/// Emit event: trend evaluated across audit runs.
pub fn emit_trend_evaluated(runs: usize, direction: &str) {
    info!(event = "audit.trend_evaluated", runs = runs, direction = %direction);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_span_create() {
        let span = audit_span("Build API", "full-stack-development");
        let _entered = span.enter();
    }
}
