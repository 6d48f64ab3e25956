//! Deviation threshold tables.
//!
//! Each (skill area, difficulty) cell holds an ascending ladder of
//! `(tier, upper bound)` steps. Tolerances widen with difficulty and with the
//! subjectivity of the skill area. Skill areas or difficulties missing from
//! the table use the default ladder for that difficulty.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use questline_core::SkillRegistry;

use super::types::{DeviationType, Difficulty};
use crate::error::{AuditError, Result};

/// Key of the default ladder table in error messages.
pub const DEFAULT_TABLE_KEY: &str = "default";

/// Ordered `(tier, inclusive upper bound)` steps; magnitudes above the last bound are critical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    steps: Vec<(DeviationType, f64)>,
}

impl ThresholdLadder {
    /// The usual three-step ladder.
    pub const fn standard(none: f64, minor: f64, major: f64) -> [(DeviationType, f64); 3] {
        [
            (DeviationType::None, none),
            (DeviationType::Minor, minor),
            (DeviationType::Major, major),
        ]
    }

    /// Build a ladder, rejecting non-finite, negative or non-ascending bounds.
    pub fn from_steps(steps: Vec<(DeviationType, f64)>) -> std::result::Result<Self, String> {
        if steps.is_empty() {
            return Err("ladder must have at least one step".into());
        }
        let mut previous: Option<(DeviationType, f64)> = None;
        for (tier, bound) in &steps {
            if !bound.is_finite() || *bound < 0.0 {
                return Err(format!("bound for {tier} must be finite and non-negative"));
            }
            if let Some((prev_tier, prev_bound)) = previous {
                if *tier <= prev_tier || *bound <= prev_bound {
                    return Err(format!(
                        "{tier} step must follow {prev_tier} with a larger bound"
                    ));
                }
            }
            previous = Some((*tier, *bound));
        }
        Ok(Self { steps })
    }

    fn builtin(none: f64, minor: f64, major: f64) -> Self {
        Self {
            steps: Self::standard(none, minor, major).to_vec(),
        }
    }

    /// First step whose bound covers `magnitude`, else critical.
    pub fn classify(&self, magnitude: f64) -> DeviationType {
        self.steps
            .iter()
            .find(|(_, bound)| *bound >= magnitude)
            .map(|(tier, _)| *tier)
            .unwrap_or(DeviationType::Critical)
    }

    /// Upper bound for a tier, if the ladder has one.
    pub fn bound(&self, tier: DeviationType) -> Option<f64> {
        self.steps.iter().find(|(t, _)| *t == tier).map(|(_, b)| *b)
    }

    pub fn steps(&self) -> &[(DeviationType, f64)] {
        &self.steps
    }

    /// Compact description such as `none<=7, minor<=15, major<=25`.
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .map(|(tier, bound)| format!("{tier}<={bound}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

type SkillTable = HashMap<Difficulty, ThresholdLadder>;

/// Nested threshold table keyed by skill slug, then difficulty.
#[derive(Debug, Clone)]
pub struct DeviationThresholds {
    by_skill: HashMap<String, SkillTable>,
    /// Default ladders indexed by [`Difficulty::index`].
    defaults: [ThresholdLadder; 4],
}

fn skill_table(rows: [(Difficulty, f64, f64, f64); 4]) -> SkillTable {
    rows.into_iter()
        .map(|(d, none, minor, major)| (d, ThresholdLadder::builtin(none, minor, major)))
        .collect()
}

impl DeviationThresholds {
    /// Built-in tables for the known skill areas plus the default ladder.
    pub fn builtin() -> Self {
        use Difficulty::*;

        let mut by_skill = HashMap::new();
        by_skill.insert(
            "full-stack-development".to_string(),
            skill_table([
                (Easy, 5.0, 10.0, 18.0),
                (Medium, 6.0, 13.0, 22.0),
                (Hard, 8.0, 16.0, 26.0),
                (Expert, 10.0, 18.0, 28.0),
            ]),
        );
        by_skill.insert(
            "cloud-devops".to_string(),
            skill_table([
                (Easy, 5.0, 11.0, 19.0),
                (Medium, 7.0, 14.0, 24.0),
                (Hard, 9.0, 17.0, 27.0),
                (Expert, 11.0, 19.0, 29.0),
            ]),
        );
        by_skill.insert(
            "ai-ml-data-science".to_string(),
            skill_table([
                (Easy, 7.0, 15.0, 24.0),
                (Medium, 9.0, 18.0, 28.0),
                (Hard, 12.0, 22.0, 32.0),
                (Expert, 15.0, 25.0, 35.0),
            ]),
        );
        by_skill.insert(
            "content-digital-marketing".to_string(),
            skill_table([
                (Easy, 8.0, 16.0, 25.0),
                (Medium, 10.0, 20.0, 30.0),
                (Hard, 13.0, 23.0, 33.0),
                (Expert, 15.0, 26.0, 36.0),
            ]),
        );

        Self {
            by_skill,
            defaults: [
                ThresholdLadder::builtin(5.0, 12.0, 20.0),
                ThresholdLadder::builtin(7.0, 15.0, 25.0),
                ThresholdLadder::builtin(10.0, 18.0, 28.0),
                ThresholdLadder::builtin(12.0, 20.0, 30.0),
            ],
        }
    }

    /// The process-wide built-in tables.
    pub fn global() -> &'static DeviationThresholds {
        static THRESHOLDS: OnceLock<DeviationThresholds> = OnceLock::new();
        THRESHOLDS.get_or_init(Self::builtin)
    }

    /// Build tables from data. The default table must cover every difficulty.
    pub fn from_tables(
        by_skill: HashMap<String, HashMap<Difficulty, Vec<(DeviationType, f64)>>>,
        defaults: HashMap<Difficulty, Vec<(DeviationType, f64)>>,
    ) -> Result<Self> {
        let mut table = build_table(DEFAULT_TABLE_KEY, defaults)?;
        let [easy, medium, hard, expert] = Difficulty::ALL
            .map(|d| table.remove(&d).ok_or(AuditError::MissingDefaultLadder(d)));
        let defaults = [easy?, medium?, hard?, expert?];

        let by_skill = by_skill
            .into_iter()
            .map(|(skill, table)| {
                let key = table_key(&skill);
                build_table(&key, table).map(|t| (key, t))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { by_skill, defaults })
    }

    /// Ladder for a skill area and difficulty, falling back to the default ladder.
    ///
    /// Skill areas are matched by registry slug or display name, then by
    /// their lowercased raw value.
    pub fn ladder_for(&self, skill_area: &str, difficulty: Difficulty) -> &ThresholdLadder {
        let key = table_key(skill_area);
        self.by_skill
            .get(&key)
            .and_then(|table| table.get(&difficulty))
            .unwrap_or(&self.defaults[difficulty.index()])
    }

    /// Classify a magnitude for a skill area and difficulty.
    pub fn classify(
        &self,
        skill_area: &str,
        difficulty: Difficulty,
        magnitude: f64,
    ) -> DeviationType {
        self.ladder_for(skill_area, difficulty).classify(magnitude)
    }

    /// Whether the skill area has its own table.
    pub fn has_skill_table(&self, skill_area: &str) -> bool {
        self.by_skill.contains_key(&table_key(skill_area))
    }
}

fn table_key(skill_area: &str) -> String {
    match SkillRegistry::global().lookup(skill_area) {
        Some(config) => config.slug.clone(),
        None => skill_area.trim().to_ascii_lowercase(),
    }
}

fn build_table(
    skill_area: &str,
    rows: HashMap<Difficulty, Vec<(DeviationType, f64)>>,
) -> Result<SkillTable> {
    rows.into_iter()
        .map(|(difficulty, steps)| {
            ThresholdLadder::from_steps(steps)
                .map(|ladder| (difficulty, ladder))
                .map_err(|reason| AuditError::InvalidThresholds {
                    skill_area: skill_area.to_string(),
                    difficulty,
                    reason,
                })
        })
        .collect()
}
