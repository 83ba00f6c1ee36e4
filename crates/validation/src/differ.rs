//! Sync Differ
//!
//! Pure set subtraction in both directions. There is no fuzzy matching: a
//! renamed file shows up as one missing entry plus one orphaned entry.

use crate::models::{FileSet, SyncDiff};

/// Compare the memory-bank file set with the instruction references.
///
/// Both output lists are sorted.
pub fn diff(memory_bank_files: &FileSet, copilot_references: &FileSet) -> SyncDiff {
    SyncDiff {
        missing: memory_bank_files
            .difference(copilot_references)
            .cloned()
            .collect(),
        orphaned: copilot_references
            .difference(memory_bank_files)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> FileSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_sets_are_in_sync() {
        let files = set(&["progress.md", "features/a.md"]);
        let result = diff(&files, &files.clone());
        assert!(result.is_in_sync());
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_both_directions() {
        let bank = set(&["projectbrief.md", "progress.md", "api/rest.md"]);
        let refs = set(&["projectbrief.md", "old.md"]);

        let result = diff(&bank, &refs);
        assert_eq!(result.missing, vec!["api/rest.md", "progress.md"]);
        assert_eq!(result.orphaned, vec!["old.md"]);
    }

    #[test]
    fn test_rename_is_missing_plus_orphaned() {
        let result = diff(&set(&["features/login.md"]), &set(&["features/auth.md"]));
        assert_eq!(result.missing, vec!["features/login.md"]);
        assert_eq!(result.orphaned, vec!["features/auth.md"]);
    }

    #[test]
    fn test_empty_bank_is_all_orphaned() {
        let result = diff(&FileSet::new(), &set(&["a.md", "b.md"]));
        assert!(result.missing.is_empty());
        assert_eq!(result.orphaned.len(), 2);
    }
}
