//! Instructions Writer
//!
//! Applies edits to `.github/copilot-instructions.md` under a content
//! preservation contract:
//!
//! - A signed document is never rewritten, not even to fix a stale listing.
//!   Callers report that case as manual follow-up.
//! - A document without the signature gets a fresh section appended after
//!   all existing content, which stays an unmodified prefix.
//!
//! Every write replaces the whole file through a temp file and a rename.
//! Concurrent writers are not coordinated; the last rename wins.

use std::io::ErrorKind;
use std::path::Path;

use memory_bank_core::{instructions_path, CORE_FILES, MEMORY_BANK_DIR, SIGNATURE_PHRASE};
use memory_bank_validation::has_signature;
use tracing::{debug, info};

use crate::models::resolution::ActionType;
use crate::utils::error::AppResult;

/// Result of a single writer call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document was rewritten
    Applied(ActionType),
    /// Nothing needed to change; no write happened
    Unchanged,
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn core_file_summary(name: &str) -> &'static str {
    match name {
        "projectbrief.md" => "Foundation document that shapes all other files",
        "productContext.md" => "Why this project exists and the problems it solves",
        "activeContext.md" => "Current work focus, recent changes and next steps",
        "systemPatterns.md" => "Architecture, key technical decisions and design patterns",
        "techContext.md" => "Technologies used, development setup and constraints",
        "progress.md" => "What works, what is left to build and known issues",
        _ => "",
    }
}

/// Render a managed section listing `files` (relative to the memory-bank root).
///
/// The section opens with a top-level heading and uses only lower-level
/// headings below it, so it extends to the end of the document once appended.
pub fn render_managed_section(files: &[String]) -> String {
    let mut out = String::new();
    out.push_str("# Copilot's Memory Bank\n\n");
    out.push_str(
        "I am Copilot, an expert software engineer whose memory resets completely \
         between sessions. ",
    );
    out.push_str(SIGNATURE_PHRASE);
    out.push_str(
        ". I rely entirely on my Memory Bank to understand the project and continue \
         work effectively, so I read all memory bank files at the start of every task.\n\n",
    );

    out.push_str("## Memory Bank Location\n\n");
    out.push_str(&format!("All memory bank files live in `{}/`.\n\n", MEMORY_BANK_DIR));

    let core: Vec<&str> = CORE_FILES
        .iter()
        .copied()
        .filter(|name| files.iter().any(|f| f == name))
        .collect();
    if !core.is_empty() {
        out.push_str("## Core Files\n\nRead these in order:\n\n");
        for (i, name) in core.iter().enumerate() {
            out.push_str(&format!("{}. `{}` - {}\n", i + 1, name, core_file_summary(name)));
        }
        out.push('\n');
    }

    let mut additional: Vec<&String> = files
        .iter()
        .filter(|f| !CORE_FILES.contains(&f.as_str()))
        .collect();
    additional.sort();
    if !additional.is_empty() {
        out.push_str("## Additional Context\n\n");
        for file in additional {
            out.push_str(&format!("- `{}`\n", file));
        }
        out.push('\n');
    }

    out.push_str("## Workflow\n\n");
    out.push_str("1. Read every memory bank file before starting a task.\n");
    out.push_str("2. Update the active context and progress files after significant changes.\n");
    out.push_str("3. Add new documents to the memory bank when a topic outgrows the core files.\n");
    out
}

/// `existing` followed by `section`, separated by a blank line.
fn append_section(existing: &str, section: &str) -> String {
    let separator = if existing.is_empty() || existing.ends_with("\n\n") {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    format!("{}{}{}", existing, separator, section)
}

// ============================================================================
// File operations
// ============================================================================

/// Write `content` to `path` through a sibling temp file and a rename.
pub async fn save_atomically(path: &Path, content: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("md.tmp");
    tokio::fs::write(&temp_path, content).await?;
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    Ok(())
}

async fn read_optional(path: &Path) -> AppResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn append_fresh_section(
    path: &Path,
    existing: &str,
    files: &[String],
) -> AppResult<WriteOutcome> {
    let updated = append_section(existing, &render_managed_section(files));
    save_atomically(path, &updated).await?;
    info!(files = files.len(), "appended managed section to instructions");
    Ok(WriteOutcome::Applied(ActionType::AppendManagedSection))
}

/// Make sure the instructions document carries a managed section.
///
/// A signed document is left untouched, however stale its listing. Otherwise
/// a section listing `files` is appended, creating the document if needed.
/// The resolver goes through here too, passing only the files the operator
/// accepted.
pub async fn update_instructions(
    project_root: &Path,
    files: &[String],
) -> AppResult<WriteOutcome> {
    let path = instructions_path(project_root);
    let existing = read_optional(&path).await?.unwrap_or_default();

    if has_signature(&existing) {
        debug!("instructions already signed, leaving untouched");
        return Ok(WriteOutcome::Unchanged);
    }
    append_fresh_section(&path, &existing, files).await
}
