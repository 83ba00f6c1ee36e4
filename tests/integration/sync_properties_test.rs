//! Sync Property Tests
//!
//! Idempotence, round-trip convergence and content preservation for the
//! writer, resolver and generator.

use tempfile::TempDir;

use memory_bank::commands::memory_bank::resolve;
use memory_bank::commands::ResolveArgs;
use memory_bank::models::generation::GenerateOptions;
use memory_bank::models::resolution::{ActionType, ResolutionStatus};
use memory_bank::models::settings::SyncConfig;
use memory_bank::services::generator::generate_memory_bank;
use memory_bank::services::instructions::update_instructions;
use memory_bank::services::resolver::{
    AutoApprove, ScriptedDecisions, CONFIRM_PROCEED, CONFIRM_SKIP, STRATEGY_AUTOMATIC,
    STRATEGY_INTERACTIVE,
};
use memory_bank::services::WriteOutcome;
use memory_bank_core::{instructions_path, memory_bank_dir, CORE_FILES};
use memory_bank_validation::{
    diff, effective_references, extract_memory_bank_files, read_instruction_references,
    BacktickScanner,
};

use super::common::{
    instructions_mtime, read_instructions, signed_section, sync_state, write_bank_files,
    write_instructions,
};

fn resolve_args(root: &std::path::Path) -> ResolveArgs {
    ResolveArgs {
        project_root: root.to_path_buf(),
        auto_resolve: None,
        decisions: None,
    }
}

/// Re-derive the diff straight from disk
async fn fresh_diff(root: &std::path::Path) -> memory_bank_validation::SyncDiff {
    let files = extract_memory_bank_files(&memory_bank_dir(root)).await.unwrap();
    let refs = read_instruction_references(&instructions_path(root), &BacktickScanner::new())
        .await
        .unwrap()
        .unwrap();
    diff(&files, &effective_references(&refs, &files))
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_generated_project_needs_no_resolution() {
    let temp = TempDir::new().unwrap();
    let generated = generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();
    assert!(generated.instructions_updated);
    assert!(sync_state(temp.path()).await.is_in_sync);

    let before = read_instructions(temp.path());
    let mtime = instructions_mtime(temp.path());
    for _ in 0..2 {
        let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut AutoApprove)
            .await
            .unwrap();
        assert!(result.resolved);
        assert_eq!(result.status, ResolutionStatus::AlreadyInSync);
        assert!(result.actions_performed.is_empty());
    }
    assert_eq!(read_instructions(temp.path()), before);
    assert_eq!(instructions_mtime(temp.path()), mtime);
}

#[tokio::test]
async fn test_regeneration_keeps_existing_documents() {
    let temp = TempDir::new().unwrap();
    generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();
    let brief = memory_bank_dir(temp.path()).join("projectbrief.md");
    std::fs::write(&brief, "# Hand edited\n").unwrap();

    let second = generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();

    assert!(second.created_files.is_empty());
    assert!(!second.instructions_updated);
    assert_eq!(std::fs::read_to_string(&brief).unwrap(), "# Hand edited\n");
}

// ============================================================================
// Round-trip convergence
// ============================================================================

#[tokio::test]
async fn test_unsigned_document_converges() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    write_bank_files(temp.path(), &["api/endpoints.md"]);
    write_instructions(
        temp.path(),
        "# Contributing\n\nRead `projectbrief.md` and `old-notes.md` first.\n",
    );

    let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut AutoApprove)
        .await
        .unwrap();

    assert!(result.resolved);
    assert_eq!(result.status, ResolutionStatus::Resolved);
    assert_eq!(
        result.actions_performed[0].action_type,
        ActionType::AppendManagedSection
    );
    assert!(fresh_diff(temp.path()).await.is_in_sync());
}

#[tokio::test]
async fn test_unsigned_document_keeps_skipped_files_unreferenced() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    write_bank_files(temp.path(), &["features/a.md", "features/b.md"]);
    let listed: Vec<String> = CORE_FILES.iter().map(|f| format!("`{}`", f)).collect();
    let original = format!("# Onboarding\n\nRead {}.\n", listed.join(", "));
    write_instructions(temp.path(), &original);
    let mut decisions =
        ScriptedDecisions::new([STRATEGY_INTERACTIVE, CONFIRM_SKIP, CONFIRM_PROCEED]);

    let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut decisions)
        .await
        .unwrap();

    let updated = read_instructions(temp.path());
    assert!(updated.starts_with(&original));
    assert!(!updated.contains("`features/a.md`"));
    assert!(updated.contains("`features/b.md`"));
    assert!(!result.resolved);
    assert_eq!(result.status, ResolutionStatus::Unresolved);
    assert_eq!(result.actions_performed.len(), 1);
    assert!(!result.actions_performed[0].description.contains("features/a.md"));
    assert_eq!(fresh_diff(temp.path()).await.missing, vec!["features/a.md"]);
}

#[tokio::test]
async fn test_signed_document_needs_manual_follow_up() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    write_bank_files(temp.path(), &["features/search.md", "testing/strategy.md"]);
    let text = signed_section(&["features/search.md", "features/removed.md"]);
    write_instructions(temp.path(), &text);
    let mtime = instructions_mtime(temp.path());
    let mut decisions = ScriptedDecisions::new([STRATEGY_AUTOMATIC]);

    let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut decisions)
        .await
        .unwrap();

    assert!(!result.resolved);
    assert_eq!(result.status, ResolutionStatus::Unresolved);
    assert!(result.message.contains("manual follow-up required"), "{}", result.message);
    assert!(result.actions_performed.is_empty());
    let final_state = result.final_state.unwrap();
    assert_eq!(final_state.missing_references, vec!["testing/strategy.md"]);
    assert_eq!(final_state.orphaned_references, vec!["features/removed.md"]);
    assert_eq!(read_instructions(temp.path()), text);
    assert_eq!(instructions_mtime(temp.path()), mtime);
}

// ============================================================================
// Content preservation
// ============================================================================

#[tokio::test]
async fn test_signed_document_is_never_rewritten_by_generation() {
    let temp = TempDir::new().unwrap();
    let text = format!(
        "# House Style\n\nTabs, not spaces.\n\n{}",
        signed_section(&["stale.md"])
    );
    write_instructions(temp.path(), &text);

    let generated = generate_memory_bank(temp.path(), 3, &GenerateOptions::default())
        .await
        .unwrap();

    assert!(!generated.instructions_updated);
    assert_eq!(read_instructions(temp.path()), text);
}

#[tokio::test]
async fn test_unsigned_document_stays_a_prefix() {
    let temp = TempDir::new().unwrap();
    let original = "# House Style\n\nTabs, not spaces.\nNo trailing newline here";
    write_instructions(temp.path(), original);
    write_bank_files(temp.path(), &CORE_FILES);

    let files: Vec<String> = CORE_FILES.iter().map(|s| s.to_string()).collect();
    let outcome = update_instructions(temp.path(), &files).await.unwrap();

    assert_eq!(outcome, WriteOutcome::Applied(ActionType::AppendManagedSection));
    let updated = read_instructions(temp.path());
    assert!(updated.starts_with(original));
    assert!(updated.len() > original.len());
    assert!(sync_state(temp.path()).await.is_in_sync);
}

#[tokio::test]
async fn test_resolution_leaves_signed_document_byte_identical() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    write_bank_files(temp.path(), &["integrations/stripe.md"]);
    let prefix = "# Team Rules\n\nNo force pushes.\n\n";
    let suffix = "# Appendix\n\nMention `ghost.md` here freely.\n";
    let cases = [
        format!("{}{}\n{}", prefix, signed_section(&["ghost.md"]), suffix),
        format!("# Notes\n\n{}", signed_section(&["ghost.md"])),
    ];

    for text in cases {
        write_instructions(temp.path(), &text);

        let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut AutoApprove)
            .await
            .unwrap();

        assert_eq!(read_instructions(temp.path()), text);
        assert_eq!(result.status, ResolutionStatus::Unresolved);
        assert!(result.actions_performed.is_empty());
        let final_state = result.final_state.unwrap();
        assert_eq!(final_state.missing_references, vec!["integrations/stripe.md"]);
        assert_eq!(final_state.orphaned_references, vec!["ghost.md"]);
    }
}

#[tokio::test]
async fn test_abort_leaves_document_byte_identical() {
    let temp = TempDir::new().unwrap();
    write_bank_files(temp.path(), &CORE_FILES);
    let text = format!("# Notes\n\n{}", signed_section(&["ghost.md"]));
    write_instructions(temp.path(), &text);
    let mtime = instructions_mtime(temp.path());

    let mut decisions = ScriptedDecisions::new(["Abort"]);
    let result = resolve(&resolve_args(temp.path()), &SyncConfig::default(), &mut decisions)
        .await
        .unwrap();

    assert_eq!(result.status, ResolutionStatus::Aborted);
    assert!(!result.resolved);
    assert_eq!(read_instructions(temp.path()), text);
    assert_eq!(instructions_mtime(temp.path()), mtime);
}
