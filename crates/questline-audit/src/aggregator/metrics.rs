//! Health metrics over a set of audit results.
//!
//! Aggregation never fails: an empty set yields the neutral all-pass view
//! and unusable deviations count as zero.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deviation::{DeviationAnalysisResult, DeviationType};
use crate::obs::emit_audit_metrics;

/// Severity of one audit result, or of a whole set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pass,
    Minor,
    Major,
    Critical,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl From<DeviationType> for AuditStatus {
    fn from(value: DeviationType) -> Self {
        match value {
            DeviationType::None => Self::Pass,
            DeviationType::Minor => Self::Minor,
            DeviationType::Major => Self::Major,
            DeviationType::Critical => Self::Critical,
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One re-scored submission inside an audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub skill_area: String,
    pub original_score: f64,
    pub new_score: f64,
    pub deviation: f64,
    pub status: AuditStatus,
    pub critical_issue: bool,
    pub timestamp: DateTime<Utc>,
}

impl AuditResult {
    /// Record for a submission whose deviation has been analyzed.
    pub fn from_analysis(
        skill_area: impl Into<String>,
        original_score: f64,
        new_score: f64,
        analysis: &DeviationAnalysisResult,
    ) -> Self {
        Self {
            skill_area: skill_area.into(),
            original_score,
            new_score,
            deviation: analysis.deviation_magnitude,
            status: analysis.deviation_type.into(),
            critical_issue: analysis.deviation_type == DeviationType::Critical,
            timestamp: analysis.metadata.timestamp,
        }
    }

    /// Absolute deviation; non-finite values count as zero.
    pub fn effective_deviation(&self) -> f64 {
        if self.deviation.is_finite() {
            self.deviation.abs()
        } else {
            0.0
        }
    }

    fn is_critical(&self) -> bool {
        self.critical_issue || self.status == AuditStatus::Critical
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandCount {
    pub count: usize,
    pub percentage: f64,
}

/// Deviation distribution. The `within_*` bands are cumulative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationBands {
    pub within_5: BandCount,
    pub within_10: BandCount,
    pub within_15: BandCount,
    pub above_15: BandCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAreaStats {
    pub count: usize,
    pub average_deviation: f64,
}

/// Dashboard view of a set of audit results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditHealthMetrics {
    pub total_results: usize,
    pub average_deviation: f64,
    pub status: AuditStatus,
    pub health_score: f64,
    pub critical_issues_count: usize,
    pub major_count: usize,
    pub bands: DeviationBands,
    pub skill_areas: BTreeMap<String, SkillAreaStats>,
}

impl AuditHealthMetrics {
    /// The all-pass view reported for an empty result set.
    pub fn neutral() -> Self {
        Self {
            total_results: 0,
            average_deviation: 0.0,
            status: AuditStatus::Pass,
            health_score: 100.0,
            critical_issues_count: 0,
            major_count: 0,
            bands: DeviationBands::default(),
            skill_areas: BTreeMap::new(),
        }
    }
}

fn band(count: usize, total: usize) -> BandCount {
    BandCount {
        count,
        percentage: count as f64 * 100.0 / total as f64,
    }
}

/// Roll up audit results into status, health score and distributions.
pub fn get_audit_health_metrics(results: &[AuditResult]) -> AuditHealthMetrics {
    if results.is_empty() {
        let metrics = AuditHealthMetrics::neutral();
        emit_audit_metrics(0, 0.0, metrics.status.as_str(), metrics.health_score);
        return metrics;
    }

    let total = results.len();
    let deviations: Vec<f64> = results
        .iter()
        .map(AuditResult::effective_deviation)
        .collect();
    let average_deviation = deviations.iter().sum::<f64>() / total as f64;

    let critical_issues_count = results.iter().filter(|r| r.is_critical()).count();
    let major_count = results
        .iter()
        .filter(|r| r.status == AuditStatus::Major)
        .count();

    let within = |limit: f64| deviations.iter().filter(|d| **d <= limit).count();
    let bands = DeviationBands {
        within_5: band(within(5.0), total),
        within_10: band(within(10.0), total),
        within_15: band(within(15.0), total),
        above_15: band(total - within(15.0), total),
    };

    let status = overall_status(average_deviation, critical_issues_count, major_count, total);
    let health_score = health_score(
        average_deviation,
        critical_issues_count,
        major_count,
        &bands,
    );

    let mut sums: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for (result, deviation) in results.iter().zip(&deviations) {
        let entry = sums.entry(result.skill_area.clone()).or_default();
        entry.0 += 1;
        entry.1 += deviation;
    }
    let skill_areas = sums
        .into_iter()
        .map(|(skill, (count, sum))| {
            (
                skill,
                SkillAreaStats {
                    count,
                    average_deviation: sum / count as f64,
                },
            )
        })
        .collect();

    emit_audit_metrics(total, average_deviation, status.as_str(), health_score);

    AuditHealthMetrics {
        total_results: total,
        average_deviation,
        status,
        health_score,
        critical_issues_count,
        major_count,
        bands,
        skill_areas,
    }
}

/// First matching rule wins.
fn overall_status(average: f64, critical: usize, major: usize, total: usize) -> AuditStatus {
    if critical > 0 || average > 15.0 {
        AuditStatus::Critical
    } else if average > 10.0 || major as f64 > total as f64 * 0.2 {
        AuditStatus::Major
    } else if average > 5.0 || major > 0 {
        AuditStatus::Minor
    } else {
        AuditStatus::Pass
    }
}

fn health_score(average: f64, critical: usize, major: usize, bands: &DeviationBands) -> f64 {
    let mut score = 100.0 - 20.0 * critical as f64 - 10.0 * major as f64;

    if average > 10.0 {
        score -= 2.0 * (average - 10.0);
    } else if average > 5.0 {
        score -= average - 5.0;
    }

    if bands.within_5.percentage >= 80.0 {
        score += 5.0;
    } else if bands.within_5.percentage >= 60.0 {
        score += 2.0;
    }
    if bands.within_10.percentage >= 90.0 {
        score += 3.0;
    }

    score.clamp(0.0, 100.0)
}
