//! Structural Validator
//!
//! Checks the six core documents, summarizes the directory structure and,
//! when asked, runs extraction → diff → classification against the
//! instructions document. Validation is a diagnostic: a missing or
//! unreadable memory bank produces a negative result, never an error.

use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;
use memory_bank_core::{
    infer_project_root, instructions_path, CoreResult, CORE_FILES, INSTRUCTIONS_FILE,
};
use tracing::{debug, info, warn};

use crate::classifier::{classify, ConflictPolicy};
use crate::differ::diff;
use crate::extractor::{
    effective_references, extract_memory_bank_files, read_instruction_references,
    BacktickScanner, ReferenceScanner,
};
use crate::models::{
    Clarity, Completeness, Consistency, CopilotSync, FileSet, IssueType, Organization,
    QualityAssessment, Severity, StructureCompliance, ValidateOptions, ValidationIssue,
    ValidationResult,
};

/// Minimum size for a core document to count as carrying real content.
const CLEAR_CONTENT_BYTES: u64 = 200;

/// Validate with the default backtick scanner.
pub async fn validate_memory_bank(
    memory_bank_path: &Path,
    options: &ValidateOptions,
    policy: &ConflictPolicy,
) -> ValidationResult {
    validate_with_scanner(memory_bank_path, options, policy, &BacktickScanner::new()).await
}

/// Validate with an explicit reference scanner.
pub async fn validate_with_scanner(
    memory_bank_path: &Path,
    options: &ValidateOptions,
    policy: &ConflictPolicy,
    scanner: &dyn ReferenceScanner,
) -> ValidationResult {
    let mut result = match list_root(memory_bank_path).await {
        Ok(listing) => structural_result(memory_bank_path, listing).await,
        Err(e) => {
            warn!("memory bank unreadable: {}", e.kind());
            unreadable_result()
        }
    };

    if options.sync_validation {
        let project_root = options
            .project_root
            .clone()
            .or_else(|| infer_project_root(memory_bank_path));

        match project_root {
            Some(root) => {
                let sync = match check_sync(memory_bank_path, &root, policy, scanner).await {
                    Ok(sync) => sync,
                    Err(e) => CopilotSync {
                        is_in_sync: false,
                        instructions_found: false,
                        memory_bank_files: Vec::new(),
                        copilot_references: Vec::new(),
                        missing_references: Vec::new(),
                        orphaned_references: Vec::new(),
                        conflict_details: None,
                        reason: Some(format!("Unable to compare with instructions: {}", e)),
                    },
                };
                attach_sync(&mut result, sync);
            }
            None => debug!("sync validation skipped: project root unknown"),
        }
    }

    info!(
        is_valid = result.is_valid,
        missing = result.missing_files.len(),
        in_sync = result.copilot_sync.as_ref().map(|s| s.is_in_sync),
        "memory bank validated"
    );
    result
}

/// Compare the memory bank under `memory_bank_dir` with the instructions
/// document of `project_root`.
///
/// A missing instructions document is reported as not in sync with a reason.
/// Only genuine I/O failures are returned as errors.
pub async fn check_sync(
    memory_bank_dir: &Path,
    project_root: &Path,
    policy: &ConflictPolicy,
    scanner: &dyn ReferenceScanner,
) -> CoreResult<CopilotSync> {
    let bank = extract_memory_bank_files(memory_bank_dir).await?;
    let refs = read_instruction_references(&instructions_path(project_root), scanner).await?;

    let Some(refs) = refs else {
        let sync_diff = diff(&bank, &FileSet::new());
        return Ok(CopilotSync {
            is_in_sync: false,
            instructions_found: false,
            memory_bank_files: bank.into_iter().collect(),
            copilot_references: Vec::new(),
            conflict_details: classify(&sync_diff, policy),
            missing_references: sync_diff.missing,
            orphaned_references: sync_diff.orphaned,
            reason: Some(format!("Instructions document {} not found", INSTRUCTIONS_FILE)),
        });
    };

    let references = effective_references(&refs, &bank);
    let sync_diff = diff(&bank, &references);

    Ok(CopilotSync {
        is_in_sync: sync_diff.is_in_sync(),
        instructions_found: true,
        memory_bank_files: bank.into_iter().collect(),
        copilot_references: references.into_iter().collect(),
        conflict_details: classify(&sync_diff, policy),
        missing_references: sync_diff.missing,
        orphaned_references: sync_diff.orphaned,
        reason: None,
    })
}

// ============================================================================
// Structure
// ============================================================================

struct RootListing {
    /// (name, size in bytes) of regular files directly under the root
    files: Vec<(String, u64)>,
    folder_count: usize,
}

async fn list_root(path: &Path) -> std::io::Result<RootListing> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut listing = RootListing {
        files: Vec::new(),
        folder_count: 0,
    };

    while let Some(entry) = entries.next_entry().await? {
        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };
        if metadata.is_dir() {
            listing.folder_count += 1;
        } else if metadata.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            listing.files.push((name, metadata.len()));
        }
    }

    Ok(listing)
}

async fn structural_result(memory_bank_path: &Path, listing: RootListing) -> ValidationResult {
    let bank = match extract_memory_bank_files(memory_bank_path).await {
        Ok(files) => files,
        Err(e) => {
            warn!("could not walk memory bank: {}", e);
            FileSet::new()
        }
    };

    let mut core_files_present = Vec::new();
    let mut missing_files = Vec::new();
    let mut issues = Vec::new();
    let mut all_clear = true;

    for name in CORE_FILES {
        match listing.files.iter().find(|(file, _)| file == name) {
            Some((_, size)) => {
                core_files_present.push(name.to_string());
                if *size == 0 {
                    issues.push(ValidationIssue::empty_file(name));
                }
                if *size < CLEAR_CONTENT_BYTES {
                    all_clear = false;
                }
            }
            None => {
                missing_files.push(name.to_string());
                issues.push(ValidationIssue::missing_file(name));
            }
        }
    }

    let additional_files: Vec<String> = bank
        .iter()
        .filter(|f| !CORE_FILES.contains(&f.as_str()))
        .cloned()
        .collect();

    let organization = if listing.folder_count > 0 {
        Organization::Semantic
    } else {
        Organization::Flat
    };

    ValidationResult {
        is_valid: missing_files.is_empty(),
        quality: QualityAssessment {
            completeness: completeness(core_files_present.len()),
            consistency: Consistency::Unchecked,
            clarity: if all_clear && !core_files_present.is_empty() {
                Clarity::Clear
            } else {
                Clarity::NeedsDetail
            },
        },
        core_files_present,
        missing_files,
        additional_files,
        structure_compliance: StructureCompliance {
            organization,
            total_files: bank.len(),
            folder_count: listing.folder_count,
        },
        issues,
        copilot_sync: None,
        validated_at: Utc::now().to_rfc3339(),
    }
}

fn unreadable_result() -> ValidationResult {
    ValidationResult {
        is_valid: false,
        core_files_present: Vec::new(),
        missing_files: CORE_FILES.iter().map(|f| f.to_string()).collect(),
        additional_files: Vec::new(),
        structure_compliance: StructureCompliance::empty(),
        quality: QualityAssessment {
            completeness: Completeness::Minimal,
            consistency: Consistency::Unchecked,
            clarity: Clarity::NeedsDetail,
        },
        issues: CORE_FILES.iter().map(|f| ValidationIssue::missing_file(f)).collect(),
        copilot_sync: None,
        validated_at: Utc::now().to_rfc3339(),
    }
}

fn completeness(present: usize) -> Completeness {
    match present {
        n if n == CORE_FILES.len() => Completeness::Complete,
        n if n >= 3 => Completeness::Partial,
        _ => Completeness::Minimal,
    }
}

fn attach_sync(result: &mut ValidationResult, sync: CopilotSync) {
    result.quality.consistency = if sync.is_in_sync {
        Consistency::Consistent
    } else {
        Consistency::Inconsistent
    };

    if !sync.instructions_found {
        result.issues.push(ValidationIssue {
            issue_type: IssueType::InstructionsMissing,
            severity: Severity::Medium,
            message: sync
                .reason
                .clone()
                .unwrap_or_else(|| "Instructions document not found".to_string()),
            file: Some(INSTRUCTIONS_FILE.to_string()),
        });
    } else if let Some(conflict) = &sync.conflict_details {
        result.issues.push(ValidationIssue {
            issue_type: IssueType::SyncConflict,
            severity: conflict.severity,
            message: format!(
                "Instructions and memory bank disagree ({}): {} missing, {} orphaned references",
                conflict.conflict_type,
                conflict.missing_references.len(),
                conflict.orphaned_references.len()
            ),
            file: Some(INSTRUCTIONS_FILE.to_string()),
        });
    }

    result.copilot_sync = Some(sync);
}
