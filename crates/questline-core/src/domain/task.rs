//! Task factor records and proof-strength levels.

use serde::{Deserialize, Serialize};

use super::error::PointsError;

/// Number of effort factors carried by every task.
pub const FACTOR_COUNT: usize = 6;

/// Normalized effort factors for a catalog task.
///
/// Supplied by the task catalog and immutable once fetched. Factors are
/// optional on the wire so that a record missing one can be rejected with a
/// precise [`PointsError::InvalidFactor`] instead of a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFactors {
    pub id: String,
    pub title: String,
    pub skill_area: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub skill: Option<f64>,
    #[serde(default)]
    pub complexity: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub prestige: Option<f64>,
    #[serde(default)]
    pub autonomy: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl TaskFactors {
    /// Create a task with every factor set.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        skill_area: impl Into<String>,
        factors: [f64; FACTOR_COUNT],
    ) -> Self {
        let [duration, skill, complexity, visibility, prestige, autonomy] = factors;
        Self {
            id: id.into(),
            title: title.into(),
            skill_area: skill_area.into(),
            duration: Some(duration),
            skill: Some(skill),
            complexity: Some(complexity),
            visibility: Some(visibility),
            prestige: Some(prestige),
            autonomy: Some(autonomy),
            is_active: true,
        }
    }

    /// Factors paired with their field names, in weight order.
    pub fn named_factors(&self) -> [(&'static str, Option<f64>); FACTOR_COUNT] {
        [
            ("duration", self.duration),
            ("skill", self.skill),
            ("complexity", self.complexity),
            ("visibility", self.visibility),
            ("prestige", self.prestige),
            ("autonomy", self.autonomy),
        ]
    }

    /// Validate that every factor is present, finite and within `[0, 1]`.
    ///
    /// Returns the factors in weight order.
    pub fn validated_factors(&self) -> Result<[f64; FACTOR_COUNT], PointsError> {
        let mut out = [0.0; FACTOR_COUNT];
        for (slot, (field, value)) in out.iter_mut().zip(self.named_factors()) {
            match value {
                Some(v) if v.is_finite() && (0.0..=1.0).contains(&v) => *slot = v,
                other => {
                    return Err(PointsError::InvalidFactor {
                        field,
                        value: other,
                        min: 0.0,
                        max: 1.0,
                    })
                }
            }
        }
        Ok(out)
    }
}

/// How verifiable a submission's proof-of-work is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ProofStrength {
    None,
    Weak,
    Moderate,
    Strong,
}

impl ProofStrength {
    /// Accepted raw values, weakest first.
    pub const ALLOWED: [u32; 4] = [0, 10, 25, 50];

    /// Flat points contributed by this proof level.
    pub fn points(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Weak => 10,
            Self::Moderate => 25,
            Self::Strong => 50,
        }
    }

    /// Whether this level unlocks the over-cap exception.
    pub fn is_maximal(self) -> bool {
        matches!(self, Self::Strong)
    }
}

impl TryFrom<u32> for ProofStrength {
    type Error = PointsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            10 => Ok(Self::Weak),
            25 => Ok(Self::Moderate),
            50 => Ok(Self::Strong),
            _ => Err(PointsError::InvalidProofStrength {
                value,
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl From<ProofStrength> for u32 {
    fn from(value: ProofStrength) -> Self {
        value.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_factors_in_weight_order() {
        let factors = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let task = TaskFactors::new("t1", "Deploy", "cloud-devops", factors);
        assert_eq!(
            task.validated_factors().unwrap(),
            [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]
        );
    }

    #[test]
    fn test_missing_factor_rejected() {
        let mut task = TaskFactors::new("t1", "Deploy", "cloud-devops", [0.5; 6]);
        task.prestige = None;
        let err = task.validated_factors().unwrap_err();
        assert_eq!(
            err,
            PointsError::InvalidFactor {
                field: "prestige",
                value: None,
                min: 0.0,
                max: 1.0
            }
        );
    }

    #[test]
    fn test_out_of_range_and_nan_factor_rejected() {
        let mut task = TaskFactors::new("t1", "Deploy", "cloud-devops", [0.5; 6]);
        task.duration = Some(1.2);
        assert!(matches!(
            task.validated_factors(),
            Err(PointsError::InvalidFactor { field: "duration", .. })
        ));

        task.duration = Some(f64::NAN);
        assert!(task.validated_factors().is_err());
    }

    #[test]
    fn test_proof_strength_conversion() {
        for raw in ProofStrength::ALLOWED {
            let level = ProofStrength::try_from(raw).unwrap();
            assert_eq!(u32::from(level), raw);
        }
        assert!(matches!(
            ProofStrength::try_from(30),
            Err(PointsError::InvalidProofStrength { value: 30, .. })
        ));
        assert!(ProofStrength::Strong.is_maximal());
        assert!(!ProofStrength::Moderate.is_maximal());
    }

    #[test]
    fn test_task_deserializes_with_missing_factor() {
        let json = r#"{"id":"t9","title":"Write docs","skillArea":"content-marketing",
            "duration":0.2,"skill":0.3,"complexity":0.1,"visibility":0.4,"prestige":0.2}"#;
        let task: TaskFactors = serde_json::from_str(json).unwrap();
        assert_eq!(task.autonomy, None);
        assert!(task.is_active);
    }
}
