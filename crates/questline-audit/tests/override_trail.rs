//! Override trail bookkeeping and its exported artifact.

use chrono::{Duration, Utc};

use questline_audit::{
    read_override_artifact, write_override_artifact, AuditAction, AuditError, OverrideLogEntry,
    OverrideTrail, OverrideTrailArtifact,
};

fn trail_with_two_reviewers() -> OverrideTrail {
    let trail = OverrideTrail::new();
    let t0 = Utc::now();
    trail
        .record_override(OverrideLogEntry::new(
            "sub-1",
            "alice",
            AuditAction::Escalate,
            "proof link is dead",
            t0,
        ))
        .unwrap();
    trail
        .record_override(OverrideLogEntry::new(
            "sub-1",
            "bob",
            AuditAction::Override,
            "found mirror of the proof",
            t0 + Duration::minutes(5),
        ))
        .unwrap();
    trail
        .record_override(OverrideLogEntry::new(
            "sub-2",
            "alice",
            AuditAction::Allow,
            "",
            t0,
        ))
        .unwrap();
    trail
}

#[test]
fn test_multiple_reviewers_append() {
    let trail = trail_with_two_reviewers();
    let entries = trail.entries_for("sub-1");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].reviewer, "alice");
    assert_eq!(entries[1].reviewer, "bob");
    assert_eq!(
        trail.effective_action("sub-1", AuditAction::FlagForReview),
        AuditAction::Override
    );
    assert_eq!(
        trail.effective_action("sub-9", AuditAction::FlagForReview),
        AuditAction::FlagForReview
    );
    assert_eq!(trail.len(), 3);
}

#[test]
fn test_blank_reviewer_is_rejected() {
    let trail = OverrideTrail::new();
    let err = trail
        .record_override(OverrideLogEntry::new(
            "sub-1",
            "  ",
            AuditAction::Allow,
            "",
            Utc::now(),
        ))
        .unwrap_err();
    assert!(matches!(err, AuditError::InvalidOverride(_)));
    assert!(trail.is_empty());
}

#[test]
fn test_artifact_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let artifact =
        OverrideTrailArtifact::from_trail(&trail_with_two_reviewers(), Utc::now()).unwrap();

    let path = write_override_artifact(&artifact, dir.path()).unwrap();
    assert!(path.exists());

    let loaded = read_override_artifact(dir.path()).unwrap();
    assert_eq!(loaded, artifact);
    assert_eq!(loaded.entry_count(), 3);
}

#[test]
fn test_tampered_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let artifact =
        OverrideTrailArtifact::from_trail(&trail_with_two_reviewers(), Utc::now()).unwrap();
    let path = write_override_artifact(&artifact, dir.path()).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, json.replace("\"override\"", "\"allow\"")).unwrap();

    let err = read_override_artifact(dir.path()).unwrap_err();
    assert!(matches!(err, AuditError::DigestMismatch { .. }));
}
