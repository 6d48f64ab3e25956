//! Audit aggregation: health metrics, audit runs and trends.

pub mod metrics;
pub mod run;
pub mod trend;

pub use metrics::{
    get_audit_health_metrics, AuditHealthMetrics, AuditResult, AuditStatus, BandCount,
    DeviationBands, SkillAreaStats,
};
pub use run::{AuditRun, AuditRunSummary, RunStatus};
pub use trend::{
    analyze_trend, SignalVote, TrendDirection, TrendReport, TrendSignal, Vote, WindowStats,
};
