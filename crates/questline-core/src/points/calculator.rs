//! Skill-weighted points formula.
//!
//! `award = clamp(base + bonus + proof)` where `base` scales the reviewed
//! score, `bonus` follows a convex curve over the weighted effort score, and
//! `proof` adds the flat proof-strength points. Totals above the skill cap are
//! clamped, except when near-maximal effort and maximal proof unlock the fixed
//! over-cap award `cap + overCapBoost`.

use serde::{Deserialize, Serialize};

use crate::domain::{PointsError, ProofStrength, TaskFactors, FACTOR_COUNT};
use crate::obs::{emit_over_cap_applied, emit_points_calculated};
use crate::skills::{SkillConfiguration, SkillRegistry};

/// Inclusive range of a valid reviewed score.
pub const SCORE_RANGE: (f64, f64) = (0.0, 100.0);
/// Steepness of the bonus curve.
pub const BONUS_CURVE_ALPHA: f64 = 5.5;
/// Points scale applied to both the base and the bonus terms.
pub const POINTS_SCALE: f64 = 1000.0;
/// Minimum effort score that, with maximal proof, unlocks the over-cap award.
pub const OVER_CAP_EFFORT_THRESHOLD: f64 = 0.95;

/// Intermediate terms of a points calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBreakdown {
    pub skill_slug: String,
    pub effort_score: f64,
    pub bonus_fraction: f64,
    pub base_points: f64,
    pub bonus_points: f64,
    pub max_bonus: f64,
    pub proof_points: u32,
    pub raw_total: f64,
    pub cap: u32,
    pub over_cap_boost: u32,
    pub capped: bool,
    pub over_cap_applied: bool,
}

/// Outcome of a points calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsResult {
    pub points_awarded: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PointsBreakdown>,
}

/// Weighted mean of the six factors, in `[0, 1]` for valid inputs.
pub fn effort_score(factors: &[f64; FACTOR_COUNT], weights: &[f64; FACTOR_COUNT]) -> f64 {
    let weighted: f64 = factors.iter().zip(weights).map(|(f, w)| f * w).sum();
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Convex bonus curve `(e^(αL) − 1) / (e^α − 1)`; 0 at `L = 0`, 1 at `L = 1`.
pub fn bonus_fraction(effort: f64) -> f64 {
    (BONUS_CURVE_ALPHA * effort).exp_m1() / BONUS_CURVE_ALPHA.exp_m1()
}

pub(crate) fn validate_score(score: f64) -> Result<f64, PointsError> {
    let (min, max) = SCORE_RANGE;
    if score.is_finite() && (min..=max).contains(&score) {
        Ok(score)
    } else {
        Err(PointsError::InvalidScore {
            value: score,
            min,
            max,
        })
    }
}

/// Points calculator bound to a skill registry.
#[derive(Debug, Clone, Copy)]
pub struct PointsCalculator<'r> {
    registry: &'r SkillRegistry,
}

impl PointsCalculator<'static> {
    /// Calculator over the built-in skill registry.
    pub fn global() -> Self {
        Self::new(SkillRegistry::global())
    }
}

impl<'r> PointsCalculator<'r> {
    pub fn new(registry: &'r SkillRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SkillRegistry {
        self.registry
    }

    /// Compute the award for a reviewed submission.
    ///
    /// # Errors
    ///
    /// Fails fast with the first violated precondition: `InvalidScore`,
    /// `MissingTask`, `InvalidFactor`, then `InvalidProofStrength`.
    pub fn calculate(
        &self,
        score: f64,
        task: Option<&TaskFactors>,
        proof_strength: u32,
        include_breakdown: bool,
    ) -> Result<PointsResult, PointsError> {
        let score = validate_score(score)?;
        let task = task.ok_or(PointsError::MissingTask)?;
        let (points_awarded, breakdown) = self.award_with_breakdown(score, task, proof_strength)?;

        Ok(PointsResult {
            points_awarded,
            breakdown: include_breakdown.then_some(breakdown),
        })
    }

    /// Validate, resolve the skill once and compute the award with its terms.
    pub(crate) fn award_with_breakdown(
        &self,
        score: f64,
        task: &TaskFactors,
        proof_strength: u32,
    ) -> Result<(u32, PointsBreakdown), PointsError> {
        let score = validate_score(score)?;
        let factors = task.validated_factors()?;
        let proof = ProofStrength::try_from(proof_strength)?;

        let skill = self.registry.resolve(&task.skill_area);
        let breakdown = compute(score, &factors, proof, skill);

        if breakdown.over_cap_applied {
            emit_over_cap_applied(&task.id, skill.cap, skill.over_cap_boost);
        }
        let points_awarded = award(&breakdown);
        emit_points_calculated(
            &task.id,
            &skill.slug,
            breakdown.effort_score,
            points_awarded,
        );

        Ok((points_awarded, breakdown))
    }
}

fn compute(
    score: f64,
    factors: &[f64; FACTOR_COUNT],
    proof: ProofStrength,
    skill: &SkillConfiguration,
) -> PointsBreakdown {
    let effort = effort_score(factors, &skill.weights);
    let fraction = bonus_fraction(effort);
    let max_bonus = POINTS_SCALE * skill.bonus_multiplier;
    let bonus = (max_bonus * fraction).min(max_bonus);
    let base = (score / 100.0) * POINTS_SCALE * skill.base_multiplier;
    let proof_points = proof.points();
    let raw_total = base + bonus + f64::from(proof_points);

    let cap = f64::from(skill.cap);
    let over_cap_applied =
        effort >= OVER_CAP_EFFORT_THRESHOLD && proof.is_maximal() && raw_total > cap;
    let capped = !over_cap_applied && raw_total > cap;

    PointsBreakdown {
        skill_slug: skill.slug.clone(),
        effort_score: effort,
        bonus_fraction: fraction,
        base_points: base,
        bonus_points: bonus,
        max_bonus,
        proof_points,
        raw_total,
        cap: skill.cap,
        over_cap_boost: skill.over_cap_boost,
        capped,
        over_cap_applied,
    }
}

fn award(breakdown: &PointsBreakdown) -> u32 {
    if breakdown.over_cap_applied {
        return breakdown.cap + breakdown.over_cap_boost;
    }
    let total = breakdown.raw_total.min(f64::from(breakdown.cap));
    total.round().max(0.0) as u32
}

/// Compute the award for a submission using the built-in skill registry.
pub fn calculate_task_points(
    score: f64,
    task: Option<&TaskFactors>,
    proof_strength: u32,
    include_breakdown: bool,
) -> Result<PointsResult, PointsError> {
    PointsCalculator::global().calculate(score, task, proof_strength, include_breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(skill_area: &str, factor: f64) -> TaskFactors {
        TaskFactors::new("task-1", "Ship it", skill_area, [factor; FACTOR_COUNT])
    }

    #[test]
    fn test_bonus_curve_endpoints() {
        assert_eq!(bonus_fraction(0.0), 0.0);
        assert!((bonus_fraction(1.0) - 1.0).abs() < 1e-12);
        // Convex: the midpoint earns far less than half.
        assert!(bonus_fraction(0.5) < 0.1);
    }

    #[test]
    fn test_effort_score_uses_weights() {
        let factors = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let weights = [3.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert!((effort_score(&factors, &weights) - 3.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_over_cap_exception_for_cloud() {
        let task = task("Cloud Computing & DevOps", 1.0);
        let result = calculate_task_points(100.0, Some(&task), 50, true).unwrap();
        assert_eq!(result.points_awarded, 3100);
        let breakdown = result.breakdown.unwrap();
        assert!(breakdown.over_cap_applied);
        assert!(!breakdown.capped);
        assert_eq!(breakdown.base_points, 1300.0);
        assert!((breakdown.bonus_points - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_applies_without_maximal_proof() {
        let result =
            calculate_task_points(100.0, Some(&task("cloud-devops", 1.0)), 25, true).unwrap();
        assert_eq!(result.points_awarded, 2400);
        assert!(result.breakdown.unwrap().capped);
    }

    #[test]
    fn test_zero_everything_awards_zero() {
        let result = calculate_task_points(0.0, Some(&task("general", 0.0)), 0, true).unwrap();
        assert_eq!(result.points_awarded, 0);
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.base_points, 0.0);
        assert_eq!(breakdown.bonus_points, 0.0);
    }

    #[test]
    fn test_zero_score_keeps_effort_bonus() {
        // Only the base term depends on the score; the bonus follows effort.
        let result = calculate_task_points(0.0, Some(&task("general", 1.0)), 0, true).unwrap();
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.base_points, 0.0);
        assert_eq!(result.points_awarded, 1000);
    }

    #[test]
    fn test_breakdown_omitted_by_default() {
        let result = calculate_task_points(50.0, Some(&task("general", 0.5)), 10, false).unwrap();
        assert!(result.breakdown.is_none());
    }

    #[test]
    fn test_validation_order() {
        assert!(matches!(
            calculate_task_points(101.0, None, 7, false),
            Err(PointsError::InvalidScore { .. })
        ));
        assert_eq!(
            calculate_task_points(50.0, None, 7, false),
            Err(PointsError::MissingTask)
        );
        assert!(matches!(
            calculate_task_points(50.0, Some(&task("general", 0.5)), 7, false),
            Err(PointsError::InvalidProofStrength { value: 7, .. })
        ));
        assert!(matches!(
            calculate_task_points(f64::NAN, Some(&task("general", 0.5)), 0, false),
            Err(PointsError::InvalidScore { .. })
        ));
    }
}
