//! Append-only trail of reviewer overrides.
//!
//! Overrides never mutate an analysis result. Each one is a separate,
//! immutable entry keyed by submission id; a submission may collect any
//! number of them over time.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deviation::AuditAction;
use crate::error::{AuditError, Result};
use crate::obs::emit_override_recorded;

/// A reviewer's recorded decision on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideLogEntry {
    pub submission_id: String,
    pub reviewer: String,
    pub action_taken: AuditAction,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl OverrideLogEntry {
    pub fn new(
        submission_id: impl Into<String>,
        reviewer: impl Into<String>,
        action_taken: AuditAction,
        notes: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            reviewer: reviewer.into(),
            action_taken,
            notes: notes.into(),
            timestamp: now,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.submission_id.trim().is_empty() {
            return Err(AuditError::InvalidOverride(
                "submission id must not be empty".into(),
            ));
        }
        if self.reviewer.trim().is_empty() {
            return Err(AuditError::InvalidOverride(
                "reviewer must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Thread-safe, append-only override log keyed by submission id.
#[derive(Debug, Default)]
pub struct OverrideTrail {
    entries: RwLock<HashMap<String, Vec<OverrideLogEntry>>>,
}

impl OverrideTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidOverride` for an empty submission id or reviewer.
    pub fn record_override(&self, entry: OverrideLogEntry) -> Result<()> {
        entry.validate()?;
        emit_override_recorded(
            &entry.submission_id,
            &entry.reviewer,
            entry.action_taken.as_str(),
        );
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(entry.submission_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    /// All overrides for a submission, in recording order.
    pub fn entries_for(&self, submission_id: &str) -> Vec<OverrideLogEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(submission_id).cloned().unwrap_or_default()
    }

    /// Most recently recorded override for a submission.
    pub fn latest_for(&self, submission_id: &str) -> Option<OverrideLogEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(submission_id).and_then(|v| v.last().cloned())
    }

    /// The action in force: the latest override if any, else the suggestion.
    pub fn effective_action(&self, submission_id: &str, suggested: AuditAction) -> AuditAction {
        self.latest_for(submission_id)
            .map(|e| e.action_taken)
            .unwrap_or(suggested)
    }

    /// Total number of recorded overrides.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ordered copy of the whole trail.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<OverrideLogEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
