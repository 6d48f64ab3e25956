//! Observability tests for points calculation tracing.

use questline_core::{
    calculate_task_points, emit_fairness_checked, emit_over_cap_applied, emit_skill_fallback,
    PointsCalculator, ScoringConfig, TaskFactors, FACTOR_COUNT,
};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_points_calculated_event_is_logged() {
    let task = TaskFactors::new("task-obs-1", "Observe", "cloud-devops", [0.5; FACTOR_COUNT]);
    calculate_task_points(60.0, Some(&task), 10, false).unwrap();
    assert!(logs_contain("points.calculated"));
    assert!(logs_contain("task-obs-1"));
}

#[traced_test]
#[test]
fn test_over_cap_event_is_logged() {
    let task = TaskFactors::new("task-obs-2", "Max out", "cloud-devops", [1.0; FACTOR_COUNT]);
    calculate_task_points(100.0, Some(&task), 50, false).unwrap();
    assert!(logs_contain("points.over_cap"));
}

#[traced_test]
#[test]
fn test_direct_emitters_do_not_panic() {
    emit_skill_fallback("frontend", "default");
    emit_over_cap_applied("task-obs-3", 2000, 500);
    emit_fairness_checked(4, 1100.0, 150.0, true);
    assert!(logs_contain("points.fairness_checked"));
}

#[traced_test]
#[test]
fn test_fairness_check_resolves_each_area_once() {
    let template = TaskFactors::new("task-obs-4", "Compare", "general", [0.6; FACTOR_COUNT]);
    PointsCalculator::global()
        .check_cross_skill_fairness(
            &template,
            80.0,
            25,
            &["unlisted-fairness-area"],
            &ScoringConfig::default(),
        )
        .unwrap();

    assert!(logs_contain("variance="));
    logs_assert(|lines: &[&str]| {
        let fallbacks = lines
            .iter()
            .filter(|line| line.contains("skill.fallback"))
            .filter(|line| line.contains("unlisted-fairness-area"))
            .count();
        match fallbacks {
            1 => Ok(()),
            n => Err(format!("expected one skill.fallback event, saw {n}")),
        }
    });
}
