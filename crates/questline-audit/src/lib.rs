//! Questline Audit Library
//!
//! Deviation analysis between self-reported and audited task scores: threshold
//! tables, classification, narrative reasoning with a deterministic fallback,
//! suggested actions, the reviewer override trail, and audit health metrics.

pub mod action;
pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod deviation;
pub mod error;
pub mod obs;
pub mod reasoner;

pub use action::{
    read_override_artifact, suggest_action, write_override_artifact, OverrideLogEntry,
    OverrideTrail, OverrideTrailArtifact,
};

pub use aggregator::{
    analyze_trend, get_audit_health_metrics, AuditHealthMetrics, AuditResult, AuditRun,
    AuditRunSummary, AuditStatus, DeviationBands, RunStatus, SkillAreaStats, TrendDirection,
    TrendReport,
};

pub use analyzer::{
    BatchDeviationReport, CriticalIssue, DeviationAnalyzer, DeviationPatterns, PatternStats,
    DEGRADED_RISK_FACTOR,
};

pub use config::AnalyzerConfig;

pub use deviation::{
    classify_deviation, deviation_magnitude, AnalysisMetadata, AuditAction, Confidence,
    DeviationAnalysisInput, DeviationAnalysisResult, DeviationClassification, DeviationThresholds,
    DeviationType, Difficulty, ScoreDirection, SubmissionContext, ThresholdLadder,
};

pub use error::{AuditError, Result};

pub use obs::audit_span;

pub use reasoner::{
    assess_confidence, build_prompt, detect_risk_factors, fallback_reasoning, DeviationReasoner,
    Narrative, TextGenerator, FALLBACK_MODEL, TEMPLATE_MODEL,
};
