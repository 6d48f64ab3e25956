//! Audit health roll-ups, runs and trends.

use chrono::{Duration, Utc};

use questline_audit::{
    analyze_trend, get_audit_health_metrics, AnalyzerConfig, AuditResult, AuditRun, AuditStatus,
    DeviationAnalysisInput, DeviationAnalyzer, Difficulty, RunStatus, TrendDirection,
};

fn record(deviation: f64, status: AuditStatus, critical_issue: bool) -> AuditResult {
    AuditResult {
        skill_area: "full-stack-development".into(),
        original_score: 75.0,
        new_score: 75.0 + deviation,
        deviation,
        status,
        critical_issue,
        timestamp: Utc::now(),
    }
}

#[test]
fn test_empty_results_are_neutral() {
    let metrics = get_audit_health_metrics(&[]);
    assert_eq!(metrics.average_deviation, 0.0);
    assert_eq!(metrics.status, AuditStatus::Pass);
    assert_eq!(metrics.health_score, 100.0);
    assert_eq!(metrics.critical_issues_count, 0);
    assert_eq!(metrics.bands.within_5.count, 0);
}

#[test]
fn test_single_critical_issue_dominates_run() {
    let mut results = vec![record(2.0, AuditStatus::Pass, false); 9];
    results.push(record(3.0, AuditStatus::Pass, true));

    let metrics = get_audit_health_metrics(&results);
    assert_eq!(metrics.status, AuditStatus::Critical);
    assert_eq!(metrics.critical_issues_count, 1);
    assert!(metrics.average_deviation < 5.0);
    // 100 - 20 + 5 (all within 5) + 3 (all within 10)
    assert_eq!(metrics.health_score, 88.0);
}

#[test]
fn test_high_average_alone_is_critical() {
    let results = vec![record(16.0, AuditStatus::Minor, false); 4];
    let metrics = get_audit_health_metrics(&results);
    assert_eq!(metrics.status, AuditStatus::Critical);
    // 100 - 2 * (16 - 10)
    assert_eq!(metrics.health_score, 88.0);
    assert_eq!(metrics.bands.above_15.percentage, 100.0);
}

#[test]
fn test_health_score_stays_in_range() {
    let results = vec![record(60.0, AuditStatus::Critical, true); 20];
    let metrics = get_audit_health_metrics(&results);
    assert_eq!(metrics.health_score, 0.0);

    let results = vec![record(0.0, AuditStatus::Pass, false); 20];
    let metrics = get_audit_health_metrics(&results);
    assert_eq!(metrics.health_score, 100.0);
}

#[tokio::test]
async fn test_analyzed_submissions_feed_a_run() {
    let analyzer = DeviationAnalyzer::template_only(AnalyzerConfig::default());
    let mut run = AuditRun::start("reviewer-1", "Cloud migration", Utc::now());

    for (user, audit) in [(80.0, 78.0), (70.0, 71.0), (95.0, 30.0)] {
        let input =
            DeviationAnalysisInput::new("Migrate", Difficulty::Medium, "cloud-devops", user, audit);
        let analysis = analyzer.analyze_deviation(&input).await;
        let result = AuditResult::from_analysis("cloud-devops", user, audit, &analysis);
        run.push_result(result).unwrap();
    }
    run.complete(Utc::now()).unwrap();

    let summary = run.summary();
    assert_eq!(summary.status, RunStatus::Completed);
    assert_eq!(summary.metrics.total_results, 3);
    assert_eq!(summary.metrics.critical_issues_count, 1);
    assert_eq!(summary.metrics.status, AuditStatus::Critical);
    assert_eq!(summary.metrics.skill_areas["cloud-devops"].count, 3);
}

#[test]
fn test_trend_over_completed_runs() {
    let base = Utc::now() - Duration::days(30);
    let mut summaries = Vec::new();
    for (day, deviation, critical) in [
        (0, 14.0, true),
        (1, 12.0, true),
        (2, 3.0, false),
        (3, 2.0, false),
    ] {
        let mut run = AuditRun::start("reviewer-2", "Weekly audit", base + Duration::days(day));
        let status = if critical {
            AuditStatus::Critical
        } else {
            AuditStatus::Pass
        };
        for _ in 0..5 {
            let result = record(deviation, status, critical);
            run.push_result(result).unwrap();
        }
        let finished = base + Duration::days(day) + Duration::hours(2);
        run.complete(finished).unwrap();
        summaries.push(run.summary());
    }

    let report = analyze_trend(&summaries);
    assert_eq!(report.direction, TrendDirection::Improving);
    assert_eq!(report.recent.map(|w| w.runs), Some(2));
    assert_eq!(report.previous.map(|w| w.runs), Some(2));

    summaries.reverse();
    assert_eq!(
        analyze_trend(&summaries).direction,
        TrendDirection::Improving
    );
}
