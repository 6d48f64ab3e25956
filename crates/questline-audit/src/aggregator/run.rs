//! Audit runs: a reviewer's batch of re-scored submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::{get_audit_health_metrics, AuditHealthMetrics, AuditResult};
use crate::error::{AuditError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Completed,
}

/// A group of audit results under one reviewer and task context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRun {
    pub id: Uuid,
    pub reviewer: String,
    pub task_title: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub results: Vec<AuditResult>,
}

impl AuditRun {
    /// Open a pending run.
    pub fn start(
        reviewer: impl Into<String>,
        task_title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reviewer: reviewer.into(),
            task_title: task_title.into(),
            status: RunStatus::Pending,
            started_at: now,
            completed_at: None,
            results: Vec::new(),
        }
    }

    /// Append a result to a pending run.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::RunAlreadyCompleted` once the run is closed.
    pub fn push_result(&mut self, result: AuditResult) -> Result<()> {
        self.ensure_pending()?;
        self.results.push(result);
        Ok(())
    }

    /// Close the run. Results are frozen from here on.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.ensure_pending()?;
        self.status = RunStatus::Completed;
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Summary fields plus health metrics for the current results.
    pub fn summary(&self) -> AuditRunSummary {
        AuditRunSummary {
            run_id: self.id,
            reviewer: self.reviewer.clone(),
            task_title: self.task_title.clone(),
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
            metrics: get_audit_health_metrics(&self.results),
        }
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.is_completed() {
            return Err(AuditError::RunAlreadyCompleted(self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRunSummary {
    pub run_id: Uuid,
    pub reviewer: String,
    pub task_title: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub metrics: AuditHealthMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AuditStatus;

    fn result(deviation: f64) -> AuditResult {
        AuditResult {
            skill_area: "cloud-devops".into(),
            original_score: 70.0,
            new_score: 70.0 + deviation,
            deviation,
            status: AuditStatus::Pass,
            critical_issue: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_lifecycle() {
        let now = Utc::now();
        let mut run = AuditRun::start("dana", "Quarterly cloud audit", now);
        assert_eq!(run.status, RunStatus::Pending);
        run.push_result(result(2.0)).unwrap();
        run.push_result(result(4.0)).unwrap();

        run.complete(now).unwrap();
        assert!(run.is_completed());
        assert_eq!(run.completed_at, Some(now));

        let summary = run.summary();
        assert_eq!(summary.metrics.total_results, 2);
        assert_eq!(summary.metrics.average_deviation, 3.0);
    }

    #[test]
    fn test_completed_run_is_frozen() {
        let mut run = AuditRun::start("dana", "t", Utc::now());
        run.complete(Utc::now()).unwrap();
        assert!(matches!(
            run.push_result(result(1.0)),
            Err(AuditError::RunAlreadyCompleted(id)) if id == run.id
        ));
        assert!(run.complete(Utc::now()).is_err());
    }
}
