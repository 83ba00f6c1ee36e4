//! Conflict Classifier
//!
//! Turns a [`SyncDiff`] into a typed, severity-rated [`ConflictDetails`].
//! Severity cutoffs come from an injectable [`ConflictPolicy`] rather than
//! constants so callers can tune them from configuration.

use memory_bank_core::is_core_file;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ConflictDetails, ConflictType, Severity, SyncDiff};

/// Thresholds and file priorities used by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictPolicy {
    /// Core files that change often and may be fixed without confirmation
    pub low_impact_files: Vec<String>,
    /// Largest conflict (in discrepancies) that can still be low severity
    pub max_auto_resolvable: usize,
    /// Conflicts larger than this are always high severity
    pub high_severity_threshold: usize,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            low_impact_files: vec!["progress.md".to_string()],
            max_auto_resolvable: 3,
            high_severity_threshold: 6,
        }
    }
}

impl ConflictPolicy {
    /// A core file outside the low-impact list.
    pub fn is_protected(&self, file: &str) -> bool {
        is_core_file(file) && !self.low_impact_files.iter().any(|f| f == file)
    }

    /// Whether a single discrepancy on `file` may be fixed without confirmation.
    pub fn is_item_auto_resolvable(&self, file: &str) -> bool {
        !self.is_protected(file)
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_auto_resolvable == 0 {
            return Err("maxAutoResolvable must be at least 1".to_string());
        }
        if self.high_severity_threshold < self.max_auto_resolvable {
            return Err(format!(
                "highSeverityThreshold ({}) cannot be below maxAutoResolvable ({})",
                self.high_severity_threshold, self.max_auto_resolvable
            ));
        }
        Ok(())
    }
}

/// Classify a diff. Returns `None` when the diff is in sync.
pub fn classify(diff: &SyncDiff, policy: &ConflictPolicy) -> Option<ConflictDetails> {
    let conflict_type = ConflictType::from_counts(diff.missing.len(), diff.orphaned.len())?;

    let total = diff.total();
    let touches_protected = diff
        .missing
        .iter()
        .chain(diff.orphaned.iter())
        .any(|f| policy.is_protected(f));

    let severity = if total > policy.high_severity_threshold
        || (touches_protected && conflict_type == ConflictType::Both)
    {
        Severity::High
    } else if touches_protected || total > policy.max_auto_resolvable {
        Severity::Medium
    } else {
        Severity::Low
    };

    let suggested_actions = diff
        .missing
        .iter()
        .map(|f| format!("Add a reference for `{}` under the appropriate heading", f))
        .chain(
            diff.orphaned
                .iter()
                .map(|f| format!("Remove the stale reference to `{}`", f)),
        )
        .collect();

    debug!(
        conflict_type = %conflict_type,
        severity = %severity,
        total,
        "classified sync conflict"
    );

    Some(ConflictDetails {
        conflict_type,
        missing_references: diff.missing.clone(),
        orphaned_references: diff.orphaned.clone(),
        severity,
        auto_resolvable: severity == Severity::Low,
        suggested_actions,
    })
}
