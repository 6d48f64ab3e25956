//! Trend analysis across audit runs.
//!
//! The most recent runs (up to three) are compared with the runs before
//! them (up to three) on three signals. Two agreeing signals decide the
//! direction; anything else is stable.

use serde::{Deserialize, Serialize};

use super::run::AuditRunSummary;
use crate::obs::emit_trend_evaluated;

const WINDOW: usize = 3;
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    AverageDeviation,
    HealthScore,
    CriticalIssues,
}

impl TrendSignal {
    fn higher_is_better(self) -> bool {
        matches!(self, Self::HealthScore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Improving,
    Unchanged,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalVote {
    pub signal: TrendSignal,
    pub recent: f64,
    pub previous: f64,
    pub vote: Vote,
}

/// Mean signals over a window of runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStats {
    pub runs: usize,
    pub average_deviation: f64,
    pub health_score: f64,
    pub critical_issues: f64,
}

impl WindowStats {
    fn of(runs: &[&AuditRunSummary]) -> Self {
        let n = runs.len() as f64;
        let mean = |f: fn(&AuditRunSummary) -> f64| runs.iter().map(|r| f(r)).sum::<f64>() / n;
        Self {
            runs: runs.len(),
            average_deviation: mean(|r| r.metrics.average_deviation),
            health_score: mean(|r| r.metrics.health_score),
            critical_issues: mean(|r| r.metrics.critical_issues_count as f64),
        }
    }

    fn signal(&self, signal: TrendSignal) -> f64 {
        match signal {
            TrendSignal::AverageDeviation => self.average_deviation,
            TrendSignal::HealthScore => self.health_score,
            TrendSignal::CriticalIssues => self.critical_issues,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub direction: TrendDirection,
    pub recent: Option<WindowStats>,
    pub previous: Option<WindowStats>,
    pub votes: Vec<SignalVote>,
}

/// Compare recent runs against earlier ones. Input order does not matter;
/// runs are ordered by `started_at`.
pub fn analyze_trend(runs: &[AuditRunSummary]) -> TrendReport {
    let report = if runs.len() < 2 {
        TrendReport {
            direction: TrendDirection::Stable,
            recent: None,
            previous: None,
            votes: Vec::new(),
        }
    } else {
        let mut ordered: Vec<&AuditRunSummary> = runs.iter().collect();
        ordered.sort_by(|a, b| b.started_at.cmp(&a.started_at));

        let recent_len = WINDOW.min(ordered.len() - ordered.len() / 2);
        let previous_len = WINDOW.min(ordered.len() - recent_len);
        let recent = WindowStats::of(&ordered[..recent_len]);
        let previous = WindowStats::of(&ordered[recent_len..recent_len + previous_len]);

        let votes: Vec<SignalVote> = [
            TrendSignal::AverageDeviation,
            TrendSignal::HealthScore,
            TrendSignal::CriticalIssues,
        ]
        .into_iter()
        .map(|signal| vote(signal, &recent, &previous))
        .collect();

        TrendReport {
            direction: majority(&votes),
            recent: Some(recent),
            previous: Some(previous),
            votes,
        }
    };

    emit_trend_evaluated(runs.len(), report.direction.as_str());
    report
}

fn vote(signal: TrendSignal, recent: &WindowStats, previous: &WindowStats) -> SignalVote {
    let (r, p) = (recent.signal(signal), previous.signal(signal));
    let delta = r - p;
    let vote = if delta.abs() <= EPSILON {
        Vote::Unchanged
    } else if (delta > 0.0) == signal.higher_is_better() {
        Vote::Improving
    } else {
        Vote::Declining
    };
    SignalVote {
        signal,
        recent: r,
        previous: p,
        vote,
    }
}

fn majority(votes: &[SignalVote]) -> TrendDirection {
    let count = |v: Vote| votes.iter().filter(|s| s.vote == v).count();
    if count(Vote::Improving) >= 2 {
        TrendDirection::Improving
    } else if count(Vote::Declining) >= 2 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}
