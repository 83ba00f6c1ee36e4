//! Tool Requests
//!
//! Typed, validated input for every exposed operation. Payloads are parsed
//! into a tagged union and checked before any pipeline runs:
//!
//! ```json
//! {"tool": "validate_memory_bank",
//!  "arguments": {"projectRoot": "/work/app", "syncValidation": true}}
//! ```

use std::path::{Path, PathBuf};

use memory_bank_core::{infer_project_root, memory_bank_dir};
use serde::{Deserialize, Serialize};

use crate::models::settings::ANALYSIS_DEPTH_RANGE;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateArgs {
    pub project_root: PathBuf,
    /// Overrides the configured setting
    #[serde(default)]
    pub semantic_organization: Option<bool>,
    /// Overrides the configured setting
    #[serde(default)]
    pub analysis_depth: Option<u32>,
    /// Replace documents that already exist
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidateArgs {
    /// Defaults to `<projectRoot>/.github/memory-bank`
    #[serde(default)]
    pub memory_bank_path: Option<PathBuf>,
    /// Inferred from `memoryBankPath` when omitted
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    #[serde(default)]
    pub sync_validation: bool,
    /// Run the resolver after validation when a conflict is found
    #[serde(default)]
    pub interactive_mode: bool,
}

impl ValidateArgs {
    /// Memory-bank directory to validate
    pub fn memory_bank(&self) -> Option<PathBuf> {
        self.memory_bank_path
            .clone()
            .or_else(|| self.project_root.as_ref().map(memory_bank_dir))
    }

    /// Project root, given or inferred from the standard layout
    pub fn root(&self) -> Option<PathBuf> {
        self.project_root
            .clone()
            .or_else(|| self.memory_bank_path.as_ref().and_then(infer_project_root))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolveArgs {
    pub project_root: PathBuf,
    /// Overrides the configured setting
    #[serde(default)]
    pub auto_resolve: Option<bool>,
    /// Scripted answers for the resolver's prompts; approve everything when omitted
    #[serde(default)]
    pub decisions: Option<Vec<String>>,
}

/// One exposed operation with its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "tool",
    content = "arguments",
    rename_all = "snake_case",
    deny_unknown_fields
)]
pub enum ToolRequest {
    GenerateMemoryBank(GenerateArgs),
    ValidateMemoryBank(ValidateArgs),
    ResolveSyncConflicts(ResolveArgs),
}

fn require_path(path: &Path, field: &str) -> AppResult<()> {
    if path.as_os_str().is_empty() {
        return Err(AppError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl ToolRequest {
    /// Parse a JSON payload
    pub fn from_json(payload: &str) -> AppResult<Self> {
        serde_json::from_str(payload)
            .map_err(|e| AppError::validation(format!("Invalid tool request: {}", e)))
    }

    /// Wire name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateMemoryBank(_) => "generate_memory_bank",
            Self::ValidateMemoryBank(_) => "validate_memory_bank",
            Self::ResolveSyncConflicts(_) => "resolve_sync_conflicts",
        }
    }

    /// Project root named by the request, used to sanitize error messages
    pub fn project_root(&self) -> Option<PathBuf> {
        match self {
            Self::GenerateMemoryBank(args) => Some(args.project_root.clone()),
            Self::ValidateMemoryBank(args) => args.root(),
            Self::ResolveSyncConflicts(args) => Some(args.project_root.clone()),
        }
    }

    /// Reject malformed arguments before anything touches the filesystem
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::GenerateMemoryBank(args) => {
                require_path(&args.project_root, "projectRoot")?;
                if let Some(depth) = args.analysis_depth {
                    if !ANALYSIS_DEPTH_RANGE.contains(&depth) {
                        return Err(AppError::validation(format!(
                            "analysisDepth must be between {} and {}",
                            ANALYSIS_DEPTH_RANGE.start(),
                            ANALYSIS_DEPTH_RANGE.end()
                        )));
                    }
                }
            }
            Self::ValidateMemoryBank(args) => {
                if let Some(path) = &args.memory_bank_path {
                    require_path(path, "memoryBankPath")?;
                }
                if let Some(root) = &args.project_root {
                    require_path(root, "projectRoot")?;
                }
                if args.memory_bank_path.is_none() && args.project_root.is_none() {
                    return Err(AppError::validation(
                        "either memoryBankPath or projectRoot is required",
                    ));
                }
                if args.interactive_mode && !args.sync_validation {
                    return Err(AppError::validation(
                        "interactiveMode requires syncValidation",
                    ));
                }
            }
            Self::ResolveSyncConflicts(args) => {
                require_path(&args.project_root, "projectRoot")?;
                if let Some(decisions) = &args.decisions {
                    if decisions.iter().any(|d| d.trim().is_empty()) {
                        return Err(AppError::validation(
                            "decisions must not contain empty answers",
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}
