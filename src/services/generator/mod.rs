//! Memory Bank Generation
//!
//! Analyze a project, write the six core documents (plus semantic folder
//! documents when enabled) and make sure the instructions document carries a
//! managed section.

pub mod analyzer;
pub mod templates;

use std::path::{Path, PathBuf};

use memory_bank_core::{memory_bank_dir, CORE_FILES, MEMORY_BANK_DIR};
use memory_bank_validation::extract_memory_bank_files;
use tracing::{debug, info};

use crate::models::generation::{GenerateOptions, GenerationResult, ProjectAnalysis};
use crate::services::instructions::{save_atomically, update_instructions};
use crate::utils::error::{AppError, AppResult};

pub use analyzer::{analyze_project, ProjectAnalyzer};

/// Documents written and skipped by one generation pass, relative to the
/// memory-bank root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenFiles {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Create `<root>/.github/memory-bank` if needed and return it.
pub async fn ensure_memory_bank_directory(project_root: &Path) -> AppResult<PathBuf> {
    let dir = memory_bank_dir(project_root);
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Write the memory-bank documents for `analysis` into `dir`.
///
/// Existing documents are kept unless `options.overwrite` is set.
pub async fn generate_memory_bank_files(
    dir: &Path,
    analysis: &ProjectAnalysis,
    options: &GenerateOptions,
) -> AppResult<WrittenFiles> {
    let mut documents: Vec<(String, String)> = CORE_FILES
        .iter()
        .filter_map(|name| templates::render_core(name, analysis).map(|c| (name.to_string(), c)))
        .collect();
    if options.semantic_organization {
        documents.extend(templates::semantic_documents(analysis));
    }

    let mut written = WrittenFiles::default();
    for (relative, content) in documents {
        let path = dir.join(&relative);
        if !options.overwrite && tokio::fs::try_exists(&path).await? {
            debug!("keeping existing {}", relative);
            written.skipped.push(relative);
            continue;
        }
        save_atomically(&path, &content).await?;
        written.created.push(relative);
    }

    Ok(written)
}

/// Full generation pipeline for one project.
pub async fn generate_memory_bank(
    project_root: &Path,
    depth: u32,
    options: &GenerateOptions,
) -> AppResult<GenerationResult> {
    let root = project_root.to_path_buf();
    let analysis = tokio::task::spawn_blocking(move || analyze_project(&root, depth))
        .await
        .map_err(|e| AppError::internal(format!("analysis task failed: {}", e)))??;

    let dir = ensure_memory_bank_directory(project_root).await?;
    let written = generate_memory_bank_files(&dir, &analysis, options).await?;

    let files: Vec<String> = extract_memory_bank_files(&dir).await?.into_iter().collect();
    let instructions_updated = update_instructions(project_root, &files).await?.is_applied();

    info!(
        created = written.created.len(),
        skipped = written.skipped.len(),
        instructions_updated,
        "memory bank generated"
    );

    Ok(GenerationResult {
        memory_bank_dir: MEMORY_BANK_DIR.to_string(),
        created_files: written.created,
        skipped_files: written.skipped,
        instructions_updated,
        analysis,
    })
}
