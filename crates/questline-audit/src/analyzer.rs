//! Deviation analyzer: classification, narrative, confidence, risk and action
//! for one submission, plus batch analysis with pattern roll-up.
//!
//! Analysis never fails outward. Invalid scores and narrative failures both
//! produce a degraded result with low confidence and a review action.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Semaphore};
use tracing::{warn, Instrument};

use questline_core::SkillRegistry;

use crate::action::suggest_action;
use crate::config::AnalyzerConfig;
use crate::deviation::{
    AnalysisMetadata, AuditAction, Confidence, DeviationAnalysisInput, DeviationAnalysisResult,
    DeviationClassification, DeviationThresholds, DeviationType, Difficulty, ScoreDirection,
};
use crate::obs::{
    audit_span, emit_batch_completed, emit_deviation_analyzed, emit_narrative_fallback,
};
use crate::reasoner::{
    assess_confidence, detect_risk_factors, fallback_reasoning, DeviationReasoner, TextGenerator,
    FALLBACK_MODEL,
};

/// Risk factor attached to degraded results.
pub const DEGRADED_RISK_FACTOR: &str = "Analysis degraded: input could not be fully evaluated";

/// Per-group statistics in a batch roll-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStats {
    pub count: usize,
    pub average_magnitude: f64,
    pub by_type: BTreeMap<DeviationType, usize>,
}

impl PatternStats {
    fn add(&mut self, result: &DeviationAnalysisResult) {
        let total = self.average_magnitude * self.count as f64 + result.deviation_magnitude;
        self.count += 1;
        self.average_magnitude = total / self.count as f64;
        *self.by_type.entry(result.deviation_type).or_default() += 1;
    }
}

/// A critical deviation surfaced by a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalIssue {
    /// Position of the submission in the batch input.
    pub index: usize,
    pub task_title: String,
    pub skill_area: String,
    pub difficulty: Difficulty,
    pub magnitude: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationPatterns {
    pub skill_area_patterns: BTreeMap<String, PatternStats>,
    pub difficulty_patterns: BTreeMap<Difficulty, PatternStats>,
    pub critical_issues: Vec<CriticalIssue>,
}

/// Outcome of a batch analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeviationReport {
    /// Analyzed submissions, in input order.
    pub results: Vec<DeviationAnalysisResult>,
    pub patterns: DeviationPatterns,
    /// Input positions that were not analyzed because the batch was cancelled.
    pub skipped: Vec<usize>,
    pub cancelled: bool,
}

/// Analyzes score deviations between user submissions and audits.
#[derive(Clone)]
pub struct DeviationAnalyzer {
    reasoner: DeviationReasoner,
    thresholds: Arc<DeviationThresholds>,
}

impl DeviationAnalyzer {
    /// Analyzer that narrates through `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>, config: AnalyzerConfig) -> Self {
        Self {
            reasoner: DeviationReasoner::new(generator, config),
            thresholds: Arc::new(DeviationThresholds::builtin()),
        }
    }

    /// Analyzer that uses deterministic narratives only.
    pub fn template_only(config: AnalyzerConfig) -> Self {
        Self {
            reasoner: DeviationReasoner::template_only(config),
            thresholds: Arc::new(DeviationThresholds::builtin()),
        }
    }

    /// Replace the built-in threshold tables.
    pub fn with_thresholds(mut self, thresholds: DeviationThresholds) -> Self {
        self.thresholds = Arc::new(thresholds);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.reasoner.config()
    }

    pub fn thresholds(&self) -> &DeviationThresholds {
        &self.thresholds
    }

    /// Analyze one submission. Never fails.
    pub async fn analyze_deviation(
        &self,
        input: &DeviationAnalysisInput,
    ) -> DeviationAnalysisResult {
        let span = audit_span(&input.task_title, &input.skill_area);
        async move {
            let started = Instant::now();

            let result = match validate_scores(input) {
                Ok(()) => self.analyze_valid(input, started).await,
                Err(reason) => {
                    emit_narrative_fallback(&input.task_title, &reason);
                    self.degraded(input, started)
                }
            };

            emit_deviation_analyzed(
                &input.task_title,
                result.deviation_type.as_str(),
                result.deviation_magnitude,
                &result.metadata.model_used,
                result.metadata.processing_time_ms,
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn analyze_valid(
        &self,
        input: &DeviationAnalysisInput,
        started: Instant,
    ) -> DeviationAnalysisResult {
        let classification = self.classify(input);
        let narrative = self.reasoner.explain(input, &classification).await;

        let (confidence, suggested_action) = if narrative.is_fallback() {
            (Confidence::Low, AuditAction::FlagForReview)
        } else {
            let suggested = suggest_action(
                classification.deviation_type,
                input.task_difficulty,
                &input.skill_area,
            );
            (assess_confidence(classification.magnitude), suggested)
        };

        DeviationAnalysisResult {
            deviation_type: classification.deviation_type,
            deviation_magnitude: classification.magnitude,
            confidence,
            reasoning: narrative.text().to_string(),
            suggested_action,
            risk_factors: detect_risk_factors(input, classification.magnitude),
            skill_area_context: self.skill_area_context(&input.skill_area),
            complexity_context: self.complexity_context(input),
            metadata: metadata(narrative.model_used(), started),
        }
    }

    /// Result for an input that cannot be analyzed normally.
    fn degraded(
        &self,
        input: &DeviationAnalysisInput,
        started: Instant,
    ) -> DeviationAnalysisResult {
        let classification = self.classify(input);

        DeviationAnalysisResult {
            deviation_type: classification.deviation_type,
            deviation_magnitude: classification.magnitude,
            confidence: Confidence::Low,
            reasoning: fallback_reasoning(
                classification.deviation_type,
                classification.magnitude,
                classification.direction,
            ),
            suggested_action: AuditAction::FlagForReview,
            risk_factors: vec![DEGRADED_RISK_FACTOR.to_string()],
            skill_area_context: self.skill_area_context(&input.skill_area),
            complexity_context: self.complexity_context(input),
            metadata: metadata(FALLBACK_MODEL, started),
        }
    }

    fn classify(&self, input: &DeviationAnalysisInput) -> DeviationClassification {
        if input.user_submitted_score.is_finite() && input.ai_audit_score.is_finite() {
            DeviationClassification::compute(
                &self.thresholds,
                &input.skill_area,
                input.task_difficulty,
                input.user_submitted_score,
                input.ai_audit_score,
            )
        } else {
            DeviationClassification {
                magnitude: 0.0,
                deviation_type: DeviationType::None,
                direction: ScoreDirection::Equal,
            }
        }
    }

    fn skill_area_context(&self, skill_area: &str) -> String {
        let table = if self.thresholds.has_skill_table(skill_area) {
            "skill-specific thresholds"
        } else {
            "default thresholds"
        };
        match SkillRegistry::global().lookup(skill_area) {
            Some(config) => format!(
                "{} ({}); {}; {}",
                config.name,
                config.slug,
                if config.highly_subjective {
                    "highly subjective"
                } else {
                    "objectively assessable"
                },
                table
            ),
            None => format!(
                "{} (no dedicated configuration); {}",
                skill_area.trim(),
                table
            ),
        }
    }

    fn complexity_context(&self, input: &DeviationAnalysisInput) -> String {
        let ladder = self
            .thresholds
            .ladder_for(&input.skill_area, input.task_difficulty);
        let mut context = format!(
            "{} task; thresholds {}",
            input.task_difficulty,
            ladder.describe()
        );
        if let Some(complexity) = &input.submission_context.complexity {
            context.push_str(&format!("; reported complexity: {complexity}"));
        }
        context
    }

    /// Analyze many submissions on a bounded worker pool.
    pub async fn batch_analyze_deviations(
        &self,
        inputs: &[DeviationAnalysisInput],
    ) -> BatchDeviationReport {
        // The sender stays alive for the whole batch so the signal never fires.
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        self.batch_analyze_deviations_until(inputs, cancel_rx).await
    }

    /// Batch analysis that stops starting new items once `cancel` turns `true`.
    ///
    /// Items already in flight finish; skipped positions are reported.
    pub async fn batch_analyze_deviations_until(
        &self,
        inputs: &[DeviationAnalysisInput],
        cancel: watch::Receiver<bool>,
    ) -> BatchDeviationReport {
        let sem = Arc::new(Semaphore::new(self.config().batch_concurrency));
        let mut tasks = Vec::with_capacity(inputs.len());

        for input in inputs {
            let analyzer = self.clone();
            let input = input.clone();
            let sem = Arc::clone(&sem);
            let cancel = cancel.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                if *cancel.borrow() {
                    return None;
                }
                Some(analyzer.analyze_deviation(&input).await)
            }));
        }

        let mut slots = Vec::with_capacity(inputs.len());
        for (index, task) in tasks.into_iter().enumerate() {
            let slot = match task.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(index, error = %e, "deviation analysis task failed");
                    Some(self.degraded(&inputs[index], Instant::now()))
                }
            };
            slots.push(slot);
        }

        let report = build_report(inputs, slots);
        emit_batch_completed(
            inputs.len(),
            report.results.len(),
            report.patterns.critical_issues.len(),
            report.cancelled,
        );
        report
    }
}

fn build_report(
    inputs: &[DeviationAnalysisInput],
    slots: Vec<Option<DeviationAnalysisResult>>,
) -> BatchDeviationReport {
    let mut patterns = DeviationPatterns::default();
    let mut results = Vec::with_capacity(slots.len());
    let mut skipped = Vec::new();

    for (index, (input, slot)) in inputs.iter().zip(slots).enumerate() {
        let Some(result) = slot else {
            skipped.push(index);
            continue;
        };

        patterns
            .skill_area_patterns
            .entry(input.skill_area.trim().to_string())
            .or_default()
            .add(&result);
        patterns
            .difficulty_patterns
            .entry(input.task_difficulty)
            .or_default()
            .add(&result);
        if result.deviation_type == DeviationType::Critical {
            patterns.critical_issues.push(CriticalIssue {
                index,
                task_title: input.task_title.clone(),
                skill_area: input.skill_area.clone(),
                difficulty: input.task_difficulty,
                magnitude: result.deviation_magnitude,
                reasoning: result.reasoning.clone(),
            });
        }
        results.push(result);
    }

    BatchDeviationReport {
        results,
        patterns,
        cancelled: !skipped.is_empty(),
        skipped,
    }
}

fn validate_scores(input: &DeviationAnalysisInput) -> Result<(), String> {
    for (name, value) in [
        ("userSubmittedScore", input.user_submitted_score),
        ("aiAuditScore", input.ai_audit_score),
    ] {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(format!("{name} {value} is outside [0, 100]"));
        }
    }
    Ok(())
}

fn metadata(model_used: &str, started: Instant) -> AnalysisMetadata {
    AnalysisMetadata {
        timestamp: Utc::now(),
        model_used: model_used.to_string(),
        processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
