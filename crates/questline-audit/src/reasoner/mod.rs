//! Deviation reasoner.
//!
//! Narratives come from an injected [`TextGenerator`]. Each attempt is bounded
//! by `narrative_timeout_ms`; errors, timeouts and blank output fall through
//! to [`prompt::fallback_reasoning`], so explaining a deviation never fails.

pub mod prompt;
pub mod risk;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::AnalyzerConfig;
use crate::deviation::{DeviationAnalysisInput, DeviationClassification};
use crate::obs::emit_narrative_fallback;

pub use prompt::{build_prompt, fallback_reasoning, truncate_excerpt};
pub use risk::{assess_confidence, detect_risk_factors, NEUTRAL_RISK_FACTOR};

/// Model label recorded when no generator is configured.
pub const TEMPLATE_MODEL: &str = "template";
/// Model label recorded when generation failed.
pub const FALLBACK_MODEL: &str = "fallback";

/// External text-generation capability.
///
/// Implement this trait to plug in a hosted model client or a test stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce free text for `prompt`.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Label recorded in analysis metadata.
    fn model_name(&self) -> &str;
}

/// Where a narrative came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narrative {
    /// Produced by the generator.
    Generated { text: String, model: String },
    /// Deterministic template; no generator configured.
    Template { text: String },
    /// Deterministic template after the generator failed.
    Fallback { text: String, reason: String },
}

impl Narrative {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated { text, .. }
            | Self::Template { text }
            | Self::Fallback { text, .. } => text,
        }
    }

    pub fn model_used(&self) -> &str {
        match self {
            Self::Generated { model, .. } => model,
            Self::Template { .. } => TEMPLATE_MODEL,
            Self::Fallback { .. } => FALLBACK_MODEL,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Explains deviations with an optional text generator.
#[derive(Clone)]
pub struct DeviationReasoner {
    generator: Option<Arc<dyn TextGenerator>>,
    config: AnalyzerConfig,
}

impl DeviationReasoner {
    pub fn new(generator: Arc<dyn TextGenerator>, config: AnalyzerConfig) -> Self {
        Self {
            generator: Some(generator),
            config: config.normalized(),
        }
    }

    /// Reasoner that always uses the deterministic templates.
    pub fn template_only(config: AnalyzerConfig) -> Self {
        Self {
            generator: None,
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Explain a classified deviation.
    pub async fn explain(
        &self,
        input: &DeviationAnalysisInput,
        classification: &DeviationClassification,
    ) -> Narrative {
        let template = || {
            fallback_reasoning(
                classification.deviation_type,
                classification.magnitude,
                classification.direction,
            )
        };

        let Some(generator) = &self.generator else {
            return Narrative::Template { text: template() };
        };

        let prompt = build_prompt(input, classification, &self.config);
        let timeout = Duration::from_millis(self.config.narrative_timeout_ms);
        let attempts = self.config.narrative_retries + 1;
        let mut last_failure = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(timeout, generator.generate(&prompt)).await {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    return Narrative::Generated {
                        text: text.trim().to_string(),
                        model: generator.model_name().to_string(),
                    };
                }
                Ok(Ok(_)) => last_failure = format!("attempt {attempt}: empty narrative"),
                Ok(Err(err)) => last_failure = format!("attempt {attempt}: {err}"),
                Err(_elapsed) => {
                    last_failure = format!(
                        "attempt {attempt}: timed out after {}ms",
                        self.config.narrative_timeout_ms
                    )
                }
            }
        }

        emit_narrative_fallback(&input.task_title, &last_failure);
        Narrative::Fallback {
            text: template(),
            reason: last_failure,
        }
    }
}
