//! Reference Extractor
//!
//! Turns the memory-bank directory and the instructions document into two
//! sets of relative file paths. Reference scanning is a literal pattern
//! match, kept behind [`ReferenceScanner`] so a stricter parser can replace
//! it without touching the differ, classifier or resolver.

use std::io::ErrorKind;
use std::path::{Component, Path};
use std::sync::OnceLock;

use memory_bank_core::{CoreResult, CORE_FILES};
use regex::Regex;
use tracing::{debug, warn};

use crate::models::FileSet;
use crate::region::find_managed_region;

// ============================================================================
// Scanner
// ============================================================================

/// Finds memory-bank file references in a piece of markdown.
pub trait ReferenceScanner: Send + Sync {
    /// All distinct references in `text`.
    fn scan(&self, text: &str) -> FileSet;
}

const REFERENCE_PATTERN: &str = r"`((?:[\w.-]+/)*[\w.-]+\.md)`";

/// Compiled reference pattern (initialized once).
fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

/// Matches backtick-quoted `*.md` tokens, optionally prefixed by folders
/// (`` `integrations/api.md` ``).
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktickScanner;

impl BacktickScanner {
    pub fn new() -> Self {
        Self
    }
}

impl ReferenceScanner for BacktickScanner {
    fn scan(&self, text: &str) -> FileSet {
        reference_pattern()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

// ============================================================================
// Instructions Document
// ============================================================================

/// References found in an instructions document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionReferences {
    /// Explicit references (managed region only, when one exists)
    pub references: FileSet,
    /// Whether the document carries the managed-section signature
    pub signed: bool,
}

/// Scan the managed region, or the whole document when it has none.
pub fn extract_instruction_references(
    text: &str,
    scanner: &dyn ReferenceScanner,
) -> InstructionReferences {
    match find_managed_region(text) {
        Some(region) => InstructionReferences {
            references: scanner.scan(region.slice(text)),
            signed: true,
        },
        None => InstructionReferences {
            references: scanner.scan(text),
            signed: false,
        },
    }
}

/// Read and scan the instructions document. `Ok(None)` when it does not exist.
pub async fn read_instruction_references(
    path: &Path,
    scanner: &dyn ReferenceScanner,
) -> CoreResult<Option<InstructionReferences>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let refs = extract_instruction_references(&text, scanner);
            debug!(
                references = refs.references.len(),
                signed = refs.signed,
                "scanned instructions document"
            );
            Ok(Some(refs))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The set the assistant will actually follow.
///
/// A signed managed section tells the assistant to read every core file, so
/// the core files that exist count as referenced even without a backticked
/// mention.
pub fn effective_references(refs: &InstructionReferences, memory_bank_files: &FileSet) -> FileSet {
    let mut effective = refs.references.clone();
    if refs.signed {
        effective.extend(
            CORE_FILES
                .iter()
                .filter(|name| memory_bank_files.contains(**name))
                .map(|name| name.to_string()),
        );
    }
    effective
}

// ============================================================================
// Memory Bank Directory
// ============================================================================

/// Every `.md` file under `root`, as `/`-separated relative paths.
///
/// A missing root yields an empty set. Symlinked directories are not followed,
/// so the walk never leaves the root. Unreadable subdirectories are skipped.
pub async fn extract_memory_bank_files(root: &Path) -> CoreResult<FileSet> {
    let mut files = FileSet::new();

    let mut pending = match tokio::fs::read_dir(root).await {
        Ok(entries) => vec![entries],
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(e.into()),
    };

    while let Some(mut entries) = pending.pop() {
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;

            if file_type.is_dir() {
                match tokio::fs::read_dir(&path).await {
                    Ok(sub) => pending.push(sub),
                    Err(e) => warn!("skipping unreadable folder {}: {}", path.display(), e),
                }
                continue;
            }

            let is_file = if file_type.is_symlink() {
                tokio::fs::metadata(&path)
                    .await
                    .map(|m| m.is_file())
                    .unwrap_or(false)
            } else {
                file_type.is_file()
            };

            if is_file && is_markdown(&path) {
                if let Some(relative) = relative_slash_path(&path, root) {
                    files.insert(relative);
                }
            }
        }
    }

    debug!(count = files.len(), "extracted memory bank files");
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// `root/features/auth.md` → `features/auth.md` on every platform.
fn relative_slash_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
