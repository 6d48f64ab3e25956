//! Prompt construction and deterministic fallback narratives.

use crate::config::AnalyzerConfig;
use crate::deviation::{
    DeviationAnalysisInput, DeviationClassification, DeviationType, ScoreDirection,
};

const TRUNCATION_MARKER: &str = "... [truncated]";

/// Cut `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

/// Structured prompt for the text-generation collaborator.
pub fn build_prompt(
    input: &DeviationAnalysisInput,
    classification: &DeviationClassification,
    config: &AnalyzerConfig,
) -> String {
    let mut out = String::new();
    out.push_str(
        "You are reviewing a scoring discrepancy on a task-completion platform. \
         Explain in 2-4 sentences why the user's self-reported score and the \
         independent audit score differ, and whether the gap looks justified.\n\n",
    );
    out.push_str(&format!("Task: {}\n", input.task_title));
    out.push_str(&format!("Skill area: {}\n", input.skill_area));
    out.push_str(&format!("Difficulty: {}\n", input.task_difficulty));
    out.push_str(&format!("User score: {:.1}\n", input.user_submitted_score));
    out.push_str(&format!("Audit score: {:.1}\n", input.ai_audit_score));
    out.push_str(&format!(
        "Deviation: {:.1} points ({}, user score is {})\n",
        classification.magnitude,
        classification.deviation_type,
        classification.direction.as_str()
    ));

    let ctx = &input.submission_context;
    if let Some(minutes) = ctx.time_spent {
        out.push_str(&format!("Time spent: {minutes:.0} minutes\n"));
    }
    if let Some(len) = input.code_length() {
        out.push_str(&format!("Code length: {len} characters\n"));
    }
    if let Some(complexity) = &ctx.complexity {
        out.push_str(&format!("Reported complexity: {complexity}\n"));
    }

    if let Some(description) = &input.task_description {
        out.push_str(&format!(
            "\nTask description:\n{}\n",
            truncate_excerpt(description, config.description_excerpt_chars)
        ));
    }
    if let Some(code) = &input.user_code {
        out.push_str(&format!(
            "\nSubmitted code:\n```\n{}\n```\n",
            truncate_excerpt(code, config.code_excerpt_chars)
        ));
    }
    if let Some(proof) = &input.user_proof {
        out.push_str(&format!(
            "\nProof of work:\n{}\n",
            truncate_excerpt(proof, config.proof_excerpt_chars)
        ));
    }
    out
}

/// Deterministic narrative used when generation is unavailable.
pub fn fallback_reasoning(
    deviation_type: DeviationType,
    magnitude: f64,
    direction: ScoreDirection,
) -> String {
    let dir = direction.as_str();
    match deviation_type {
        DeviationType::None => format!(
            "The submitted score is consistent with the audit score \
             (difference of {magnitude:.1} points). No further review is needed."
        ),
        DeviationType::Minor => format!(
            "Minor deviation of {magnitude:.1} points: the user's score is {dir} than the \
             audit score, within the expected tolerance for this task."
        ),
        DeviationType::Major => format!(
            "Major deviation of {magnitude:.1} points: the user's score is {dir} than the \
             audit score. Manual review is recommended."
        ),
        DeviationType::Critical => format!(
            "Critical deviation of {magnitude:.1} points: the user's score is {dir} than the \
             audit score. Escalation to a senior reviewer is required."
        ),
    }
}
