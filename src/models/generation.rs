//! Generation Models
//!
//! Project analysis produced by the analyzer and consumed by the templates,
//! plus generation options and results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Project type detected from marker files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Node.js/JavaScript/TypeScript project (package.json)
    NodeJs,
    /// Rust project (Cargo.toml)
    Rust,
    /// Python project (pyproject.toml, setup.py, requirements.txt)
    Python,
    /// Go project (go.mod)
    Go,
    /// Unknown/unsupported project type
    Unknown,
}

impl ProjectType {
    /// Get human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::NodeJs => "Node.js",
            ProjectType::Rust => "Rust",
            ProjectType::Python => "Python",
            ProjectType::Go => "Go",
            ProjectType::Unknown => "Unknown",
        }
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Metadata extracted from the project's manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Manifest the metadata was read from, relative to the project root
    pub marker_file: Option<String>,
    pub has_typescript: bool,
    pub has_tests: bool,
    /// Detected test framework
    pub test_framework: Option<String>,
    /// Has CI/CD configuration
    pub has_ci: bool,
}

/// A top-level directory and how many source files it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySummary {
    pub name: String,
    pub file_count: usize,
}

/// Descriptive, heuristic picture of a project used to fill templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    /// Manifest name, or the root folder name
    pub project_name: String,
    pub project_type: ProjectType,
    pub metadata: ProjectMetadata,
    /// File counts keyed by language name
    pub languages: BTreeMap<String, usize>,
    pub directories: Vec<DirectorySummary>,
    /// Frameworks and notable libraries found in the manifest
    pub frameworks: Vec<String>,
    pub total_files: usize,
    /// Looks like an HTTP/RPC service
    pub has_api: bool,
    /// Has deployment descriptors (Dockerfile, k8s, compose)
    pub has_deployment: bool,
}

impl ProjectAnalysis {
    /// Language with the most files
    pub fn primary_language(&self) -> Option<&str> {
        self.languages
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(lang, _)| lang.as_str())
    }
}

/// Options for `generate_memory_bank_files`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Write additional documents into purpose-named subfolders
    pub semantic_organization: bool,
    /// Replace documents that already exist
    pub overwrite: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            semantic_organization: true,
            overwrite: false,
        }
    }
}

/// Outcome of a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Memory-bank root, relative to the project root
    pub memory_bank_dir: String,
    /// Documents written, relative to the memory-bank root
    pub created_files: Vec<String>,
    /// Documents left alone because they already existed
    pub skipped_files: Vec<String>,
    /// Whether the instructions document was written
    pub instructions_updated: bool,
    pub analysis: ProjectAnalysis,
}
