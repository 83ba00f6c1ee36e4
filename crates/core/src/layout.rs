//! Memory Bank Layout
//!
//! Fixed on-disk layout shared by the validator, the instructions writer and
//! the generator:
//!
//! ```text
//! <project>/.github/copilot-instructions.md
//! <project>/.github/memory-bank/{projectbrief,productContext,...}.md
//! <project>/.github/memory-bank/<folder>/<name>.md
//! ```

use std::path::{Path, PathBuf};

/// Memory-bank root, relative to the project root
pub const MEMORY_BANK_DIR: &str = ".github/memory-bank";

/// Instructions document, relative to the project root
pub const INSTRUCTIONS_FILE: &str = ".github/copilot-instructions.md";

/// The six mandatory documents, in reading order.
pub const CORE_FILES: [&str; 6] = [
    "projectbrief.md",
    "productContext.md",
    "activeContext.md",
    "systemPatterns.md",
    "techContext.md",
    "progress.md",
];

/// Purpose-named subfolders used when semantic organization is active.
pub const SEMANTIC_FOLDERS: [&str; 7] = [
    "features",
    "api",
    "integrations",
    "deployment",
    "testing",
    "security",
    "performance",
];

/// Literal phrase identifying the managed section of the instructions document.
/// Matched case-insensitively.
pub const SIGNATURE_PHRASE: &str = "After every memory reset, I begin completely fresh";

/// `<project>/.github/memory-bank`
pub fn memory_bank_dir(project_root: impl AsRef<Path>) -> PathBuf {
    project_root.as_ref().join(MEMORY_BANK_DIR)
}

/// `<project>/.github/copilot-instructions.md`
pub fn instructions_path(project_root: impl AsRef<Path>) -> PathBuf {
    project_root.as_ref().join(INSTRUCTIONS_FILE)
}

/// Whether `relative_path` names one of the six core documents at the root.
pub fn is_core_file(relative_path: &str) -> bool {
    CORE_FILES.contains(&relative_path)
}

/// Recover the project root from a memory-bank directory laid out as
/// `<project>/.github/memory-bank`. Returns `None` for any other layout.
pub fn infer_project_root(memory_bank_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = memory_bank_dir.as_ref();
    let github = dir.parent()?;
    if dir.file_name()? != "memory-bank" || github.file_name()? != ".github" {
        return None;
    }
    github.parent().map(Path::to_path_buf)
}
