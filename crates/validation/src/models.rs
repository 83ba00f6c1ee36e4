//! Validation Models
//!
//! Data structures produced by the read-only pipeline: sync diffs, conflict
//! records, structural validation results. Every value is built fresh per
//! call and never cached.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A set of memory-bank relative paths (`folder/name.md`, `/` separators).
pub type FileSet = BTreeSet<String>;

// ============================================================================
// Sync Diff
// ============================================================================

/// Result of comparing the memory-bank file set with the instruction references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncDiff {
    /// Present in the memory bank, never mentioned by the instructions
    pub missing: Vec<String>,
    /// Mentioned by the instructions, absent from the memory bank
    pub orphaned: Vec<String>,
}

impl SyncDiff {
    /// Whether both directions are empty
    pub fn is_in_sync(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }

    /// Total number of discrepancies
    pub fn total(&self) -> usize {
        self.missing.len() + self.orphaned.len()
    }
}

// ============================================================================
// Conflict Classification
// ============================================================================

/// Conflict shape, derived from which diff lists are non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// Only memory-bank files without references
    Missing,
    /// Only references without memory-bank files
    Orphaned,
    /// Both kinds present
    Both,
}

impl ConflictType {
    /// Classify from list sizes. `None` when both are empty (in sync).
    pub fn from_counts(missing: usize, orphaned: usize) -> Option<Self> {
        match (missing > 0, orphaned > 0) {
            (true, true) => Some(Self::Both),
            (true, false) => Some(Self::Missing),
            (false, true) => Some(Self::Orphaned),
            (false, false) => None,
        }
    }
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictType::Missing => write!(f, "MISSING"),
            ConflictType::Orphaned => write!(f, "ORPHANED"),
            ConflictType::Both => write!(f, "BOTH"),
        }
    }
}

/// Severity label used for conflicts and validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A typed, severity-rated conflict record.
///
/// Invariant: the conflict type matches the non-emptiness of the two lists,
/// and at least one list is non-empty. Build through
/// [`crate::classifier::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetails {
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub missing_references: Vec<String>,
    pub orphaned_references: Vec<String>,
    pub severity: Severity,
    pub auto_resolvable: bool,
    pub suggested_actions: Vec<String>,
}

impl ConflictDetails {
    /// Total number of discrepancies
    pub fn total(&self) -> usize {
        self.missing_references.len() + self.orphaned_references.len()
    }

    /// Individual discrepancies: missing first, then orphaned, each in list order.
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        self.missing_references
            .iter()
            .map(|f| Discrepancy::missing(f.clone()))
            .chain(
                self.orphaned_references
                    .iter()
                    .map(|f| Discrepancy::orphaned(f.clone())),
            )
            .collect()
    }
}

/// Direction of a single discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// File exists, reference absent
    Missing,
    /// Reference exists, file absent
    Orphaned,
}

/// One file-level discrepancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub file: String,
}

impl Discrepancy {
    pub fn missing(file: impl Into<String>) -> Self {
        Self {
            kind: DiscrepancyKind::Missing,
            file: file.into(),
        }
    }

    pub fn orphaned(file: impl Into<String>) -> Self {
        Self {
            kind: DiscrepancyKind::Orphaned,
            file: file.into(),
        }
    }
}

// ============================================================================
// Copilot Sync
// ============================================================================

/// Sync state between the memory bank and the instructions document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopilotSync {
    pub is_in_sync: bool,
    /// Whether the instructions document exists
    pub instructions_found: bool,
    pub memory_bank_files: Vec<String>,
    pub copilot_references: Vec<String>,
    pub missing_references: Vec<String>,
    pub orphaned_references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_details: Option<ConflictDetails>,
    /// Explanation when not in sync for a structural reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// Structural Validation
// ============================================================================

/// Memory-bank organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organization {
    /// All documents at the root
    Flat,
    /// At least one subfolder
    Semantic,
}

/// Directory structure summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureCompliance {
    pub organization: Organization,
    /// Markdown documents anywhere under the root
    pub total_files: usize,
    /// Subfolders directly under the root
    pub folder_count: usize,
}

impl StructureCompliance {
    pub fn empty() -> Self {
        Self {
            organization: Organization::Flat,
            total_files: 0,
            folder_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// All six core files
    Complete,
    /// Three to five
    Partial,
    /// Fewer than three
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Consistent,
    Inconsistent,
    /// Sync validation was not run
    Unchecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clarity {
    Clear,
    NeedsDetail,
}

/// Quality labels for a memory bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub completeness: Completeness,
    pub consistency: Consistency,
    pub clarity: Clarity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingFile,
    EmptyFile,
    SyncConflict,
    InstructionsMissing,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ValidationIssue {
    pub fn missing_file(file: &str) -> Self {
        Self {
            issue_type: IssueType::MissingFile,
            severity: Severity::High,
            message: format!("Core file {} is missing", file),
            file: Some(file.to_string()),
        }
    }

    pub fn empty_file(file: &str) -> Self {
        Self {
            issue_type: IssueType::EmptyFile,
            severity: Severity::Medium,
            message: format!("Core file {} is empty", file),
            file: Some(file.to_string()),
        }
    }
}

/// Options for [`crate::validator::validate_memory_bank`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidateOptions {
    /// Compare the memory bank with the instructions document
    pub sync_validation: bool,
    /// Project root; inferred from the standard layout when absent
    pub project_root: Option<PathBuf>,
    /// Run interactive resolution afterwards (handled by the caller)
    pub interactive_mode: bool,
}

/// Aggregated validation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// All six core files present
    pub is_valid: bool,
    pub core_files_present: Vec<String>,
    pub missing_files: Vec<String>,
    pub additional_files: Vec<String>,
    pub structure_compliance: StructureCompliance,
    pub quality: QualityAssessment,
    pub issues: Vec<ValidationIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copilot_sync: Option<CopilotSync>,
    /// When the validation ran (RFC 3339)
    pub validated_at: String,
}
