//! Deviation tier to remediation action.

use questline_core::SkillRegistry;

use crate::deviation::{AuditAction, DeviationType, Difficulty};

/// Suggest the next step for a classified deviation.
///
/// Minor deviations are allowed unless the task is expert-level or the skill
/// area is highly subjective, where a reviewer should take a look.
pub fn suggest_action(
    deviation_type: DeviationType,
    difficulty: Difficulty,
    skill_area: &str,
) -> AuditAction {
    match deviation_type {
        DeviationType::None => AuditAction::Allow,
        DeviationType::Minor => {
            if difficulty == Difficulty::Expert
                || SkillRegistry::global().is_highly_subjective(skill_area)
            {
                AuditAction::FlagForReview
            } else {
                AuditAction::Allow
            }
        }
        DeviationType::Major => AuditAction::FlagForReview,
        DeviationType::Critical => AuditAction::Escalate,
    }
}
