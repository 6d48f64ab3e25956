//! Cross-skill fairness check.
//!
//! Scores one set of effort factors under several skill areas and reports
//! whether the spread of awards stays within the configured tolerance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::calculator::PointsCalculator;
use crate::config::ScoringConfig;
use crate::domain::{PointsError, TaskFactors};
use crate::obs::emit_fairness_checked;

/// Outcome of a cross-skill fairness check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessReport {
    /// Award per resolved skill slug.
    pub points_by_skill: BTreeMap<String, u32>,
    pub mean: f64,
    /// Population variance of the awards.
    pub variance: f64,
    pub std_dev: f64,
    pub tolerance: f64,
    pub is_fair: bool,
}

impl<'r> PointsCalculator<'r> {
    /// Compare awards for an equivalent task across skill areas.
    ///
    /// An empty `skill_areas` slice checks every known skill area. The check
    /// flags unfairness when the population variance of the awards exceeds
    /// `config.fairness_tolerance × mean`.
    pub fn check_cross_skill_fairness(
        &self,
        template: &TaskFactors,
        score: f64,
        proof_strength: u32,
        skill_areas: &[&str],
        config: &ScoringConfig,
    ) -> Result<FairnessReport, PointsError> {
        let areas: Vec<String> = if skill_areas.is_empty() {
            self.registry()
                .configurations()
                .iter()
                .map(|c| c.slug.clone())
                .collect()
        } else {
            skill_areas.iter().map(|s| s.to_string()).collect()
        };

        let mut points_by_skill = BTreeMap::new();
        for area in areas {
            let mut task = template.clone();
            task.skill_area = area;
            let (points, breakdown) = self.award_with_breakdown(score, &task, proof_strength)?;
            points_by_skill.insert(breakdown.skill_slug, points);
        }

        let n = points_by_skill.len() as f64;
        let (mean, variance) = if points_by_skill.is_empty() {
            (0.0, 0.0)
        } else {
            let mean = points_by_skill.values().map(|p| f64::from(*p)).sum::<f64>() / n;
            let variance = points_by_skill
                .values()
                .map(|p| (f64::from(*p) - mean).powi(2))
                .sum::<f64>()
                / n;
            (mean, variance)
        };
        let tolerance = config.fairness_tolerance;
        let is_fair = variance <= tolerance * mean;

        emit_fairness_checked(points_by_skill.len(), mean, variance, is_fair);

        Ok(FairnessReport {
            points_by_skill,
            mean,
            variance,
            std_dev: variance.sqrt(),
            tolerance,
            is_fair,
        })
    }
}
