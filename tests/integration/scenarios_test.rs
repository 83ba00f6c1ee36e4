//! Validation Scenario Tests
//!
//! Partial bank, orphaned-only, mixed and already-synced projects.

use tempfile::TempDir;

use memory_bank::commands::memory_bank::resolve;
use memory_bank::commands::ResolveArgs;
use memory_bank::models::generation::GenerateOptions;
use memory_bank::models::resolution::{ResolutionStatus, StepType};
use memory_bank::models::settings::SyncConfig;
use memory_bank::services::generator::generate_memory_bank;
use memory_bank::services::resolver::ScriptedDecisions;
use memory_bank_core::{memory_bank_dir, CORE_FILES};
use memory_bank_validation::{
    classify, extract_memory_bank_files, validate_memory_bank, Completeness, ConflictPolicy,
    ConflictType, Consistency, IssueType, Organization, Severity, SyncDiff, ValidateOptions,
};

use super::common::{
    instructions_mtime, read_instructions, signed_section, write_bank_files, write_instructions,
};

fn sync_options(root: &std::path::Path) -> ValidateOptions {
    ValidateOptions {
        sync_validation: true,
        project_root: Some(root.to_path_buf()),
        interactive_mode: false,
    }
}

// ============================================================================
// Scenario A: partial memory bank
// ============================================================================

#[tokio::test]
async fn test_partial_memory_bank_lists_each_missing_file() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &["projectbrief.md", "productContext.md"]);

    let result = validate_memory_bank(
        &memory_bank_dir(temp.path()),
        &ValidateOptions::default(),
        &ConflictPolicy::default(),
    )
    .await;

    assert!(!result.is_valid);
    assert_eq!(result.core_files_present, vec!["projectbrief.md", "productContext.md"]);
    assert_eq!(result.missing_files.len(), 4);
    assert!(result.missing_files.contains(&"progress.md".to_string()));
    assert_eq!(result.issues.len(), 4);
    assert!(result.issues.iter().all(|i| i.issue_type == IssueType::MissingFile));
    assert_eq!(result.quality.completeness, Completeness::Minimal);
    assert_eq!(result.quality.consistency, Consistency::Unchecked);
    assert!(result.copilot_sync.is_none());
}

#[tokio::test]
async fn test_missing_memory_bank_is_a_negative_result() {
    let temp = TempDir::new().unwrap();

    let result = validate_memory_bank(
        &memory_bank_dir(temp.path()),
        &sync_options(temp.path()),
        &ConflictPolicy::default(),
    )
    .await;

    assert!(!result.is_valid);
    assert!(result.core_files_present.is_empty());
    assert_eq!(result.missing_files.len(), 6);
}

// ============================================================================
// Scenario B: orphaned references only
// ============================================================================

#[tokio::test]
async fn test_orphaned_only_conflict() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    write_instructions(
        temp.path(),
        &signed_section(&[
            "projectbrief.md",
            "progress.md",
            "ghost-a.md",
            "old/ghost-b.md",
            "ghost-c.md",
        ]),
    );

    let result = validate_memory_bank(
        &memory_bank_dir(temp.path()),
        &sync_options(temp.path()),
        &ConflictPolicy::default(),
    )
    .await;

    assert!(result.is_valid);
    let sync = result.copilot_sync.unwrap();
    assert!(!sync.is_in_sync);
    let details = sync.conflict_details.unwrap();
    assert_eq!(details.conflict_type, ConflictType::Orphaned);
    assert!(details.missing_references.is_empty());
    assert_eq!(details.orphaned_references.len(), 3);
    assert_eq!(details.suggested_actions.len(), 3);
    assert_eq!(result.quality.consistency, Consistency::Inconsistent);
    assert!(result.issues.iter().any(|i| i.issue_type == IssueType::SyncConflict));
}

// ============================================================================
// Scenario C: mixed conflict
// ============================================================================

#[tokio::test]
async fn test_mixed_conflict_after_generation() {
    let temp = TempDir::new().unwrap();
    generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();
    write_instructions(
        temp.path(),
        concat!(
            "# Project Notes\n\n",
            "Start with `projectbrief.md`, then `ghost.md` and `features/gone.md`.\n"
        ),
    );

    let result = validate_memory_bank(
        &memory_bank_dir(temp.path()),
        &sync_options(temp.path()),
        &ConflictPolicy::default(),
    )
    .await;

    assert_eq!(result.structure_compliance.organization, Organization::Semantic);
    let details = result.copilot_sync.unwrap().conflict_details.unwrap();
    assert_eq!(details.conflict_type, ConflictType::Both);
    assert_eq!(details.orphaned_references, vec!["features/gone.md", "ghost.md"]);
    assert!(details.missing_references.contains(&"features/overview.md".to_string()));
    assert!(!details.auto_resolvable);
}

// ============================================================================
// Scenario D: already in sync
// ============================================================================

#[tokio::test]
async fn test_already_synced_resolves_without_touching_files() {
    let temp = TempDir::new().unwrap();
    generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();
    let files = extract_memory_bank_files(&memory_bank_dir(temp.path()))
        .await
        .unwrap();
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    let text = format!("# Team Notes\n\nBe kind.\n\n{}", signed_section(&refs));
    write_instructions(temp.path(), &text);

    let result = validate_memory_bank(
        &memory_bank_dir(temp.path()),
        &sync_options(temp.path()),
        &ConflictPolicy::default(),
    )
    .await;
    let sync = result.copilot_sync.unwrap();
    assert!(sync.is_in_sync);
    assert!(sync.conflict_details.is_none());

    let before = instructions_mtime(temp.path());
    let mut decisions = ScriptedDecisions::new(Vec::<String>::new());
    let resolution = resolve(
        &ResolveArgs {
            project_root: temp.path().to_path_buf(),
            auto_resolve: None,
            decisions: None,
        },
        &SyncConfig::default(),
        &mut decisions,
    )
    .await
    .unwrap();

    assert!(resolution.resolved);
    assert_eq!(resolution.status, ResolutionStatus::AlreadyInSync);
    assert!(resolution.actions_performed.is_empty());
    assert!(resolution.user_choices.is_empty());
    assert_eq!(resolution.conversation_log.len(), 1);
    assert_eq!(resolution.conversation_log[0].step_type, StepType::Information);
    assert_eq!(read_instructions(temp.path()), text);
    assert_eq!(instructions_mtime(temp.path()), before);
}

// ============================================================================
// Classification boundaries
// ============================================================================

#[test]
fn test_classification_boundaries() {
    let policy = ConflictPolicy::default();
    let list = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert!(classify(&SyncDiff::default(), &policy).is_none());

    let progress_only = classify(
        &SyncDiff {
            missing: list(&["progress.md"]),
            orphaned: vec![],
        },
        &policy,
    )
    .unwrap();
    assert_eq!(progress_only.conflict_type, ConflictType::Missing);
    assert_eq!(progress_only.severity, Severity::Low);
    assert!(progress_only.auto_resolvable);

    let mixed_core = classify(
        &SyncDiff {
            missing: list(&["techContext.md"]),
            orphaned: list(&["systemPatterns-old.md", "activeContext.md"]),
        },
        &policy,
    )
    .unwrap();
    assert_eq!(mixed_core.conflict_type, ConflictType::Both);
    assert!(!mixed_core.auto_resolvable);
}

#[test]
fn test_classification_is_total() {
    let policy = ConflictPolicy::default();
    let pools: [&[&str]; 3] = [&[], &["a.md"], &["features/b.md", "projectbrief.md"]];

    for missing in pools {
        for orphaned in pools {
            let diff = SyncDiff {
                missing: missing.iter().map(|s| s.to_string()).collect(),
                orphaned: orphaned.iter().map(|s| s.to_string()).collect(),
            };
            let expected = match (missing.is_empty(), orphaned.is_empty()) {
                (true, true) => None,
                (false, true) => Some(ConflictType::Missing),
                (true, false) => Some(ConflictType::Orphaned),
                (false, false) => Some(ConflictType::Both),
            };
            let details = classify(&diff, &policy);
            assert_eq!(details.as_ref().map(|d| d.conflict_type), expected);
            if let Some(d) = details {
                assert_eq!(d.suggested_actions.len(), missing.len() + orphaned.len());
                assert_eq!(d.auto_resolvable, d.severity == Severity::Low);
            }
        }
    }
}
