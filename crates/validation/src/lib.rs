//! Memory Bank Validation
//!
//! The read-only half of the memory-bank engine. Everything here inspects the
//! filesystem and never writes to it:
//!
//! - `models` - Wire types (SyncDiff, ConflictDetails, CopilotSync, ValidationResult, etc.)
//! - `region` - Managed-region detection in the instructions document
//! - `extractor` - Memory-bank file listing and instruction reference scanning
//! - `differ` - Pure set comparison producing missing/orphaned lists
//! - `classifier` - Conflict type, severity and auto-resolvability
//! - `validator` - Structural validation with optional sync checking
//!
//! Writing (instructions updates, conflict resolution, generation) lives in the
//! main crate's `services` module.

pub mod classifier;
pub mod differ;
pub mod extractor;
pub mod models;
pub mod region;
pub mod validator;

// Re-export model types
pub use models::{
    Clarity, Completeness, ConflictDetails, ConflictType, Consistency, CopilotSync,
    Discrepancy, DiscrepancyKind, FileSet, IssueType, Organization, QualityAssessment, Severity,
    StructureCompliance, SyncDiff, ValidateOptions, ValidationIssue, ValidationResult,
};

pub use classifier::{classify, ConflictPolicy};
pub use differ::diff;
pub use extractor::{
    effective_references, extract_instruction_references, extract_memory_bank_files,
    read_instruction_references, BacktickScanner, InstructionReferences, ReferenceScanner,
};
pub use region::{find_managed_region, has_signature, ManagedRegion};
pub use validator::{check_sync, validate_memory_bank, validate_with_scanner};
