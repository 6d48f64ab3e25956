//! Multi-task summation and theoretical point ranges.

use serde::{Deserialize, Serialize};

use super::calculator::{PointsCalculator, PointsResult};
use crate::domain::{PointsError, ProofStrength, TaskFactors};

/// One reviewed submission within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    pub score: f64,
    pub task: TaskFactors,
    pub proof_strength: u32,
}

/// Totals across a batch of submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPointsSummary {
    pub total_points: u64,
    pub average_points: f64,
    pub results: Vec<PointsResult>,
}

/// Lowest and highest award a task can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRange {
    pub min: u32,
    pub max: u32,
}

impl<'r> PointsCalculator<'r> {
    /// Score every submission, failing on the first invalid one.
    ///
    /// The error is wrapped in [`PointsError::BatchItem`] with the item index.
    pub fn calculate_batch(
        &self,
        submissions: &[TaskSubmission],
        include_breakdown: bool,
    ) -> Result<BatchPointsSummary, PointsError> {
        let results = submissions
            .iter()
            .enumerate()
            .map(|(index, s)| {
                self.calculate(s.score, Some(&s.task), s.proof_strength, include_breakdown)
                    .map_err(|e| PointsError::BatchItem {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_points: u64 = results.iter().map(|r| u64::from(r.points_awarded)).sum();
        let average_points = if results.is_empty() {
            0.0
        } else {
            total_points as f64 / results.len() as f64
        };

        Ok(BatchPointsSummary {
            total_points,
            average_points,
            results,
        })
    }

    /// Award range for a task: score 0 with no proof up to score 100 with strong proof.
    pub fn theoretical_range(&self, task: &TaskFactors) -> Result<PointsRange, PointsError> {
        let min = self.calculate(0.0, Some(task), ProofStrength::None.points(), false)?;
        let max = self.calculate(100.0, Some(task), ProofStrength::Strong.points(), false)?;
        Ok(PointsRange {
            min: min.points_awarded,
            max: max.points_awarded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FACTOR_COUNT;

    fn submission(score: f64, factor: f64, proof: u32) -> TaskSubmission {
        TaskSubmission {
            score,
            task: TaskFactors::new("t", "Task", "general", [factor; FACTOR_COUNT]),
            proof_strength: proof,
        }
    }

    #[test]
    fn test_batch_totals_and_average() {
        let calc = PointsCalculator::global();
        let summary = calc
            .calculate_batch(
                &[submission(50.0, 0.0, 0), submission(100.0, 0.0, 10)],
                false,
            )
            .unwrap();
        // 500 + (1000 + 10)
        assert_eq!(summary.total_points, 1510);
        assert_eq!(summary.average_points, 755.0);
        assert_eq!(summary.results.len(), 2);
    }

    #[test]
    fn test_empty_batch() {
        let summary = PointsCalculator::global()
            .calculate_batch(&[], false)
            .unwrap();
        assert_eq!(summary.total_points, 0);
        assert_eq!(summary.average_points, 0.0);
    }

    #[test]
    fn test_batch_reports_failing_index() {
        let err = PointsCalculator::global()
            .calculate_batch(&[submission(50.0, 0.5, 0), submission(50.0, 0.5, 3)], false)
            .unwrap_err();
        match err {
            PointsError::BatchItem { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, PointsError::InvalidProofStrength { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_theoretical_range() {
        let task = TaskFactors::new("t", "Task", "general", [0.0; FACTOR_COUNT]);
        let range = PointsCalculator::global().theoretical_range(&task).unwrap();
        assert_eq!(range, PointsRange { min: 0, max: 1050 });
    }
}
