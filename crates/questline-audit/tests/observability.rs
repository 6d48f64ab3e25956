//! Observability tests for the audit pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing_test::traced_test;

use questline_audit::{
    analyze_trend, audit_span, get_audit_health_metrics, AnalyzerConfig, AuditAction,
    DeviationAnalysisInput, DeviationAnalyzer, Difficulty, OverrideLogEntry, OverrideTrail,
    TextGenerator,
};

struct Broken;

#[async_trait]
impl TextGenerator for Broken {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        anyhow::bail!("connection reset")
    }

    fn model_name(&self) -> &str {
        "broken"
    }
}

#[traced_test]
#[tokio::test]
async fn test_analysis_emits_event() {
    let analyzer = DeviationAnalyzer::template_only(AnalyzerConfig::default());
    let input = DeviationAnalysisInput::new("obs-task-1", Difficulty::Easy, "frontend", 85.0, 78.0);
    analyzer.analyze_deviation(&input).await;
    assert!(logs_contain("deviation.analyzed"));
    assert!(logs_contain("obs-task-1"));
}

#[traced_test]
#[tokio::test]
async fn test_fallback_emits_warning() {
    let analyzer = DeviationAnalyzer::new(Arc::new(Broken), AnalyzerConfig::default());
    let input =
        DeviationAnalysisInput::new("obs-task-2", Difficulty::Hard, "cloud-devops", 60.0, 90.0);
    analyzer.analyze_deviation(&input).await;
    assert!(logs_contain("deviation.narrative_fallback"));
    assert!(logs_contain("connection reset"));
}

#[traced_test]
#[tokio::test]
async fn test_batch_emits_completion() {
    let analyzer = DeviationAnalyzer::template_only(AnalyzerConfig::default());
    let inputs = vec![DeviationAnalysisInput::new(
        "obs-batch",
        Difficulty::Easy,
        "frontend",
        50.0,
        50.0,
    )];
    analyzer.batch_analyze_deviations(&inputs).await;
    assert!(logs_contain("deviation.batch_completed"));
}

#[traced_test]
#[test]
fn test_override_and_metrics_events() {
    let trail = OverrideTrail::new();
    trail
        .record_override(OverrideLogEntry::new(
            "sub-obs",
            "erin",
            AuditAction::Allow,
            "ok",
            Utc::now(),
        ))
        .unwrap();
    get_audit_health_metrics(&[]);
    analyze_trend(&[]);

    assert!(logs_contain("override.recorded"));
    assert!(logs_contain("audit.metrics_computed"));
    assert!(logs_contain("audit.trend_evaluated"));
}

#[test]
fn test_audit_span_create() {
    let span = audit_span("obs-span", "frontend");
    let _entered = span.enter();
}

#[traced_test]
#[tokio::test]
async fn test_analysis_events_carry_audit_span_fields() {
    let analyzer = DeviationAnalyzer::template_only(AnalyzerConfig::default());
    let input =
        DeviationAnalysisInput::new("span-fields", Difficulty::Easy, "frontend", 70.0, 68.0);
    analyzer.analyze_deviation(&input).await;

    assert!(logs_contain("questline.audit"));
    assert!(logs_contain("task_title=span-fields"));
    assert!(logs_contain("skill_area=frontend"));
}

#[tokio::test]
async fn test_analysis_runs_inside_spawned_task() {
    let analyzer = DeviationAnalyzer::template_only(AnalyzerConfig::default());
    let input = DeviationAnalysisInput::new("spawned", Difficulty::Easy, "frontend", 70.0, 68.0);
    let handle = tokio::spawn(async move { analyzer.analyze_deviation(&input).await });
    let result = handle.await.unwrap();
    assert_eq!(result.suggested_action, AuditAction::Allow);
}
