//! Tamper-evident export of the override trail.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::overrides::{OverrideLogEntry, OverrideTrail};
use crate::error::{AuditError, Result};

/// File name of the exported trail inside the target directory.
pub const OVERRIDE_ARTIFACT_FILE: &str = "override_trail.json";

/// Immutable snapshot of an override trail with a SHA-256 content digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideTrailArtifact {
    pub exported_at: DateTime<Utc>,
    pub entries: BTreeMap<String, Vec<OverrideLogEntry>>,
    pub content_digest: String,
}

impl OverrideTrailArtifact {
    /// Snapshot `trail` and seal it with a digest.
    pub fn from_trail(trail: &OverrideTrail, now: DateTime<Utc>) -> Result<Self> {
        let entries = trail.snapshot();
        let content_digest = compute_digest(now, &entries)?;
        Ok(Self {
            exported_at: now,
            entries,
            content_digest,
        })
    }

    /// Recompute the digest and compare it with the recorded one.
    pub fn verify(&self) -> Result<()> {
        let actual = compute_digest(self.exported_at, &self.entries)?;
        if actual != self.content_digest {
            return Err(AuditError::DigestMismatch {
                expected: self.content_digest.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Number of entries across all submissions.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

fn compute_digest(
    exported_at: DateTime<Utc>,
    entries: &BTreeMap<String, Vec<OverrideLogEntry>>,
) -> Result<String> {
    let payload = serde_json::to_vec(&(exported_at.to_rfc3339(), entries))?;
    Ok(hex::encode(Sha256::digest(&payload)))
}

/// Persist `<dir>/override_trail.json`.
pub fn write_override_artifact(artifact: &OverrideTrailArtifact, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(OVERRIDE_ARTIFACT_FILE);
    let json = serde_json::to_vec_pretty(artifact)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read `<dir>/override_trail.json` and verify its digest.
pub fn read_override_artifact(dir: &Path) -> Result<OverrideTrailArtifact> {
    let json = std::fs::read(dir.join(OVERRIDE_ARTIFACT_FILE))?;
    let artifact: OverrideTrailArtifact = serde_json::from_slice(&json)?;
    artifact.verify()?;
    Ok(artifact)
}
