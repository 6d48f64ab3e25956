//! Confidence banding and heuristic risk factors.

use questline_core::SkillRegistry;

use crate::deviation::{Confidence, DeviationAnalysisInput, Difficulty};

/// Reported when no heuristic triggers.
pub const NEUTRAL_RISK_FACTOR: &str = "Standard deviation analysis";

const LARGE_DEVIATION: f64 = 20.0;
const SUBJECTIVE_DEVIATION: f64 = 15.0;
const EXPERT_DEVIATION: f64 = 10.0;
const MIN_CODE_CHARS: usize = 100;
const MIN_MINUTES_SPENT: f64 = 10.0;

/// Clear-cut cases at both ends are high confidence; the middle band is ambiguous.
pub fn assess_confidence(magnitude: f64) -> Confidence {
    if magnitude <= 5.0 || magnitude >= 30.0 {
        Confidence::High
    } else if magnitude <= 15.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Independent heuristics over the scores and submission signals.
///
/// Returns [`NEUTRAL_RISK_FACTOR`] alone when nothing triggers.
pub fn detect_risk_factors(input: &DeviationAnalysisInput, magnitude: f64) -> Vec<String> {
    let mut factors = Vec::new();
    let user = input.user_submitted_score;
    let audit = input.ai_audit_score;

    if magnitude > LARGE_DEVIATION {
        factors.push(format!("Large score deviation ({magnitude:.1} points)"));
    }
    if magnitude > SUBJECTIVE_DEVIATION
        && SkillRegistry::global().is_highly_subjective(&input.skill_area)
    {
        factors.push(format!(
            "Highly subjective skill area ({}) with significant deviation",
            input.skill_area
        ));
    }
    if input.task_difficulty == Difficulty::Expert && magnitude > EXPERT_DEVIATION {
        factors.push("Expert-level task with notable deviation".to_string());
    }
    if let Some(len) = input.code_length() {
        if len < MIN_CODE_CHARS {
            factors.push(format!("Very short code submission ({len} characters)"));
        }
    }
    if let Some(minutes) = input.submission_context.time_spent {
        if minutes < MIN_MINUTES_SPENT {
            factors.push(format!("Very short time spent ({minutes:.0} minutes)"));
        }
    }
    if user > 90.0 && audit < 60.0 {
        factors.push(format!(
            "Possible score inflation: user score {user:.0} vs audit score {audit:.0}"
        ));
    }
    if user < 30.0 && audit > 70.0 {
        factors.push(format!(
            "Possible score deflation: user score {user:.0} vs audit score {audit:.0}"
        ));
    }

    if factors.is_empty() {
        factors.push(NEUTRAL_RISK_FACTOR.to_string());
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deviation::{deviation_magnitude, SubmissionContext};

    fn input(difficulty: Difficulty, skill: &str, user: f64, audit: f64) -> DeviationAnalysisInput {
        DeviationAnalysisInput::new("Task", difficulty, skill, user, audit)
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(assess_confidence(0.0), Confidence::High);
        assert_eq!(assess_confidence(5.0), Confidence::High);
        assert_eq!(assess_confidence(5.5), Confidence::Medium);
        assert_eq!(assess_confidence(15.0), Confidence::Medium);
        assert_eq!(assess_confidence(22.0), Confidence::Low);
        assert_eq!(assess_confidence(30.0), Confidence::High);
    }

    #[test]
    fn test_neutral_factor_when_nothing_triggers() {
        let i = input(Difficulty::Medium, "frontend", 80.0, 76.0);
        assert_eq!(
            detect_risk_factors(&i, 4.0),
            vec![NEUTRAL_RISK_FACTOR.to_string()]
        );
    }

    #[test]
    fn test_inflation_combines_with_large_deviation() {
        let i = input(Difficulty::Medium, "frontend", 95.0, 50.0);
        let factors = detect_risk_factors(&i, deviation_magnitude(95.0, 50.0));
        assert_eq!(factors.len(), 2);
        assert!(factors[0].starts_with("Large score deviation"));
        assert!(factors[1].contains("inflation"));
    }

    #[test]
    fn test_deflation() {
        let i = input(Difficulty::Easy, "frontend", 20.0, 75.0);
        let factors = detect_risk_factors(&i, 55.0);
        assert!(factors.iter().any(|f| f.contains("deflation")));
    }

    #[test]
    fn test_subjective_and_expert_heuristics() {
        let i = input(Difficulty::Expert, "AI/ML & Data Science", 70.0, 86.0);
        let factors = detect_risk_factors(&i, 16.0);
        assert!(factors.iter().any(|f| f.contains("Highly subjective")));
        assert!(factors.iter().any(|f| f.contains("Expert-level")));
        assert!(!factors.iter().any(|f| f.contains("Large score")));
    }

    #[test]
    fn test_submission_signals() {
        let i = input(Difficulty::Easy, "frontend", 80.0, 78.0)
            .with_code("print('hi')")
            .with_context(SubmissionContext {
                time_spent: Some(4.0),
                ..SubmissionContext::default()
            });
        let factors = detect_risk_factors(&i, 2.0);
        assert!(factors.iter().any(|f| f.contains("short code")));
        assert!(factors.iter().any(|f| f.contains("short time")));
    }
}
