//! Skill configuration registry.
//!
//! Each skill area carries its own multipliers, cap, over-cap boost and
//! factor weights. The registry is a read-only lookup table: unknown skill
//! areas resolve to the default configuration, which is not an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::domain::{SkillConfigError, FACTOR_COUNT};
use crate::obs::emit_skill_fallback;

/// Accepted range for base and bonus multipliers.
pub const MULTIPLIER_RANGE: (f64, f64) = (0.5, 2.0);
/// Accepted range for the points cap.
pub const CAP_RANGE: (f64, f64) = (1000.0, 5000.0);
/// Accepted range for the over-cap boost.
pub const OVER_CAP_BOOST_RANGE: (f64, f64) = (100.0, 1000.0);

/// Scoring parameters for one skill area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillConfiguration {
    /// Stable identifier, e.g. `cloud-devops`.
    pub slug: String,
    /// Display name as shown in the task catalog.
    pub name: String,
    pub base_multiplier: f64,
    pub bonus_multiplier: f64,
    pub cap: u32,
    pub over_cap_boost: u32,
    /// Weights for duration, skill, complexity, visibility, prestige, autonomy.
    pub weights: [f64; FACTOR_COUNT],
    /// Whether reviewers are expected to disagree more often in this area.
    #[serde(default)]
    pub highly_subjective: bool,
}

impl SkillConfiguration {
    /// The fallback used for skill areas that match no known configuration.
    pub fn fallback() -> Self {
        Self {
            slug: "default".into(),
            name: "General".into(),
            base_multiplier: 1.0,
            bonus_multiplier: 1.0,
            cap: 2000,
            over_cap_boost: 500,
            weights: [1.0; FACTOR_COUNT],
            highly_subjective: false,
        }
    }
}

fn builtin_configurations() -> Vec<SkillConfiguration> {
    vec![
        SkillConfiguration {
            slug: "full-stack-development".into(),
            name: "Full-Stack Software Development".into(),
            base_multiplier: 1.2,
            bonus_multiplier: 1.1,
            cap: 2200,
            over_cap_boost: 600,
            weights: [1.0, 1.4, 1.3, 0.8, 0.9, 1.0],
            highly_subjective: false,
        },
        SkillConfiguration {
            slug: "cloud-devops".into(),
            name: "Cloud Computing & DevOps".into(),
            base_multiplier: 1.3,
            bonus_multiplier: 1.2,
            cap: 2400,
            over_cap_boost: 700,
            weights: [1.1, 1.3, 1.4, 0.7, 0.8, 1.1],
            highly_subjective: false,
        },
        SkillConfiguration {
            slug: "ai-ml-data-science".into(),
            name: "AI/ML & Data Science".into(),
            base_multiplier: 1.4,
            bonus_multiplier: 1.3,
            cap: 2600,
            over_cap_boost: 800,
            weights: [1.0, 1.5, 1.4, 0.8, 1.0, 1.2],
            highly_subjective: true,
        },
        SkillConfiguration {
            slug: "content-digital-marketing".into(),
            name: "Content Creation & Digital Marketing".into(),
            base_multiplier: 0.9,
            bonus_multiplier: 1.0,
            cap: 1800,
            over_cap_boost: 400,
            weights: [1.0, 0.9, 0.8, 1.4, 1.2, 1.0],
            highly_subjective: true,
        },
    ]
}

fn check_range(
    slug: &str,
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), SkillConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SkillConfigError::OutOfRange {
            slug: slug.to_string(),
            field,
            value,
            min,
            max,
        })
    }
}

/// Check a configuration against the registry's invariant ranges.
pub fn validate_skill_configuration(config: &SkillConfiguration) -> Result<(), SkillConfigError> {
    let slug = config.slug.trim();
    if slug.is_empty() {
        return Err(SkillConfigError::EmptySlug);
    }
    check_range(
        slug,
        "baseMultiplier",
        config.base_multiplier,
        MULTIPLIER_RANGE,
    )?;
    check_range(
        slug,
        "bonusMultiplier",
        config.bonus_multiplier,
        MULTIPLIER_RANGE,
    )?;
    check_range(slug, "cap", f64::from(config.cap), CAP_RANGE)?;
    check_range(
        slug,
        "overCapBoost",
        f64::from(config.over_cap_boost),
        OVER_CAP_BOOST_RANGE,
    )?;

    let weights_ok = config.weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && config.weights.iter().sum::<f64>() > 0.0;
    if !weights_ok {
        return Err(SkillConfigError::InvalidWeights {
            slug: slug.to_string(),
        });
    }
    Ok(())
}

/// Immutable lookup table of skill configurations keyed by slug and display name.
#[derive(Debug, Clone)]
pub struct SkillRegistry {
    configurations: Vec<SkillConfiguration>,
    index: HashMap<String, usize>,
    fallback: SkillConfiguration,
}

impl SkillRegistry {
    /// Build a registry from data, validating every entry.
    pub fn from_configurations(
        configurations: Vec<SkillConfiguration>,
        fallback: SkillConfiguration,
    ) -> Result<Self, SkillConfigError> {
        validate_skill_configuration(&fallback)?;

        let mut index = HashMap::new();
        for (pos, config) in configurations.iter().enumerate() {
            validate_skill_configuration(config)?;
            let slug = config.slug.trim().to_ascii_lowercase();
            if index.insert(slug.clone(), pos).is_some() {
                return Err(SkillConfigError::DuplicateSlug(slug));
            }
            index
                .entry(config.name.trim().to_ascii_lowercase())
                .or_insert(pos);
        }

        Ok(Self {
            configurations,
            index,
            fallback,
        })
    }

    /// The process-wide registry of built-in skill areas.
    pub fn global() -> &'static SkillRegistry {
        static REGISTRY: OnceLock<SkillRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let configurations = builtin_configurations();
            Self {
                index: index_builtin(&configurations),
                configurations,
                fallback: SkillConfiguration::fallback(),
            }
        })
    }

    /// Resolve a skill area by slug or display name, falling back to the default.
    pub fn resolve(&self, skill_area: &str) -> &SkillConfiguration {
        match self.lookup(skill_area) {
            Some(config) => config,
            None => {
                emit_skill_fallback(skill_area, &self.fallback.slug);
                &self.fallback
            }
        }
    }

    /// Resolve a skill area without falling back.
    pub fn lookup(&self, skill_area: &str) -> Option<&SkillConfiguration> {
        let key = skill_area.trim().to_ascii_lowercase();
        self.index
            .get(&key)
            .and_then(|pos| self.configurations.get(*pos))
    }

    /// Whether the skill area resolves to a highly subjective configuration.
    pub fn is_highly_subjective(&self, skill_area: &str) -> bool {
        self.lookup(skill_area)
            .map(|c| c.highly_subjective)
            .unwrap_or(self.fallback.highly_subjective)
    }

    /// Known configurations, in registration order.
    pub fn configurations(&self) -> &[SkillConfiguration] {
        &self.configurations
    }

    /// The configuration used for unknown skill areas.
    pub fn fallback(&self) -> &SkillConfiguration {
        &self.fallback
    }
}

fn index_builtin(configurations: &[SkillConfiguration]) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (pos, config) in configurations.iter().enumerate() {
        index.insert(config.slug.to_ascii_lowercase(), pos);
        index.insert(config.name.to_ascii_lowercase(), pos);
    }
    index
}
