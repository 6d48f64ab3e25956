//! Deviation analysis inputs, outputs and their enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task difficulty as published in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    /// Position within [`Difficulty::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Expert => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier of a score discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationType {
    None,
    Minor,
    Major,
    Critical,
}

impl DeviationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for DeviationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How clear-cut a classification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Remediation step for a submission under audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Allow,
    FlagForReview,
    Escalate,
    Override,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::FlagForReview => "flag_for_review",
            Self::Escalate => "escalate",
            Self::Override => "override",
        }
    }

    /// Whether a human needs to look at the submission.
    pub fn requires_review(self) -> bool {
        matches!(self, Self::FlagForReview | Self::Escalate)
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way the user's score departs from the audit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDirection {
    Higher,
    Lower,
    Equal,
}

impl ScoreDirection {
    pub fn of(user_score: f64, audit_score: f64) -> Self {
        if user_score > audit_score {
            Self::Higher
        } else if user_score < audit_score {
            Self::Lower
        } else {
            Self::Equal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Higher => "higher",
            Self::Lower => "lower",
            Self::Equal => "equal",
        }
    }
}

/// Optional signals about how the submission was produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContext {
    /// Minutes spent on the task.
    #[serde(default)]
    pub time_spent: Option<f64>,
    /// Characters of submitted code.
    #[serde(default)]
    pub code_length: Option<usize>,
    #[serde(default)]
    pub complexity: Option<String>,
}

/// Everything needed to analyze one score discrepancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationAnalysisInput {
    pub task_title: String,
    pub task_difficulty: Difficulty,
    pub skill_area: String,
    pub user_submitted_score: f64,
    pub ai_audit_score: f64,
    #[serde(default)]
    pub user_code: Option<String>,
    #[serde(default)]
    pub user_proof: Option<String>,
    #[serde(default)]
    pub task_description: Option<String>,
    #[serde(default)]
    pub submission_context: SubmissionContext,
}

impl DeviationAnalysisInput {
    pub fn new(
        task_title: impl Into<String>,
        task_difficulty: Difficulty,
        skill_area: impl Into<String>,
        user_submitted_score: f64,
        ai_audit_score: f64,
    ) -> Self {
        Self {
            task_title: task_title.into(),
            task_difficulty,
            skill_area: skill_area.into(),
            user_submitted_score,
            ai_audit_score,
            user_code: None,
            user_proof: None,
            task_description: None,
            submission_context: SubmissionContext::default(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.user_code = Some(code.into());
        self
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.user_proof = Some(proof.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.task_description = Some(description.into());
        self
    }

    pub fn with_context(mut self, context: SubmissionContext) -> Self {
        self.submission_context = context;
        self
    }

    /// Submitted code length: the explicit context value, else the code itself.
    pub fn code_length(&self) -> Option<usize> {
        self.submission_context
            .code_length
            .or_else(|| self.user_code.as_ref().map(|c| c.chars().count()))
    }
}

/// Bookkeeping attached to every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub timestamp: DateTime<Utc>,
    pub model_used: String,
    pub processing_time_ms: u64,
}

/// Immutable outcome of one deviation analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationAnalysisResult {
    pub deviation_type: DeviationType,
    pub deviation_magnitude: f64,
    pub confidence: Confidence,
    pub reasoning: String,
    pub suggested_action: AuditAction,
    pub risk_factors: Vec<String>,
    pub skill_area_context: String,
    pub complexity_context: String,
    pub metadata: AnalysisMetadata,
}
