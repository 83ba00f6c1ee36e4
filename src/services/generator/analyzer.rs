//! Project Analysis
//!
//! Heuristic, read-only inspection of a project: type and metadata from marker
//! files (package.json, Cargo.toml, pyproject.toml, go.mod), language counts,
//! top-level directories and notable frameworks.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::models::generation::{DirectorySummary, ProjectAnalysis, ProjectMetadata, ProjectType};
use crate::utils::error::{AppError, AppResult};

/// Frameworks recognized by dependency name, with display names.
const KNOWN_FRAMEWORKS: &[(&str, &str)] = &[
    // Node.js
    ("react", "React"),
    ("next", "Next.js"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("@angular/core", "Angular"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("@nestjs/core", "NestJS"),
    ("prisma", "Prisma"),
    // Rust
    ("tokio", "Tokio"),
    ("axum", "Axum"),
    ("actix-web", "Actix Web"),
    ("rocket", "Rocket"),
    ("tauri", "Tauri"),
    ("clap", "Clap"),
    ("serde", "Serde"),
    ("diesel", "Diesel"),
    ("sqlx", "SQLx"),
    // Python
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("sqlalchemy", "SQLAlchemy"),
    ("pydantic", "Pydantic"),
    // Go
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo", "Echo"),
    ("github.com/gofiber/fiber", "Fiber"),
    ("gorm.io/gorm", "GORM"),
];

/// Frameworks that imply an HTTP surface
const WEB_FRAMEWORKS: &[&str] = &[
    "Express", "Fastify", "NestJS", "Next.js", "Axum", "Actix Web", "Rocket", "Django", "Flask",
    "FastAPI", "Gin", "Echo", "Fiber",
];

/// Project analyzer
pub struct ProjectAnalyzer {
    /// Project root path
    project_path: PathBuf,
    /// Directory levels to descend when counting files
    depth: u32,
}

impl ProjectAnalyzer {
    /// Create a new analyzer for the given path
    pub fn new(project_path: impl AsRef<Path>, depth: u32) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            depth,
        }
    }

    /// Run the analysis
    pub fn analyze(&self) -> AppResult<ProjectAnalysis> {
        if !self.project_path.is_dir() {
            return Err(AppError::not_found(format!(
                "Project directory not found: {}",
                self.project_path.display()
            )));
        }

        let (project_type, metadata, dependencies) = self.detect();

        let mut analysis = ProjectAnalysis {
            project_name: metadata.name.clone().unwrap_or_else(|| self.folder_name()),
            project_type,
            metadata,
            ..Default::default()
        };

        analysis.frameworks = KNOWN_FRAMEWORKS
            .iter()
            .filter(|(dep, _)| dependencies.iter().any(|d| d == dep))
            .map(|(_, name)| name.to_string())
            .collect();

        self.walk(&self.project_path, 0, None, &mut analysis);
        analysis.directories.sort_by(|a, b| a.name.cmp(&b.name));

        analysis.has_api = analysis
            .frameworks
            .iter()
            .any(|f| WEB_FRAMEWORKS.contains(&f.as_str()))
            || analysis
                .directories
                .iter()
                .any(|d| matches!(d.name.as_str(), "api" | "routes" | "handlers" | "controllers"));
        const DEPLOYMENT_MARKERS: [&str; 5] =
            ["Dockerfile", "docker-compose.yml", "compose.yaml", "k8s", "helm"];
        analysis.has_deployment = DEPLOYMENT_MARKERS
            .iter()
            .any(|m| self.project_path.join(m).exists());

        debug!(
            project = %analysis.project_name,
            files = analysis.total_files,
            frameworks = analysis.frameworks.len(),
            "analyzed project"
        );
        Ok(analysis)
    }

    fn folder_name(&self) -> String {
        self.project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Detect the project type from the first marker file found.
    ///
    /// Manifest parse failures are logged and leave metadata empty; analysis
    /// is descriptive and never fails on a malformed manifest.
    fn detect(&self) -> (ProjectType, ProjectMetadata, Vec<String>) {
        let detections = [
            (ProjectType::Rust, "Cargo.toml"),
            (ProjectType::NodeJs, "package.json"),
            (ProjectType::Python, "pyproject.toml"),
            (ProjectType::Python, "setup.py"),
            (ProjectType::Python, "requirements.txt"),
            (ProjectType::Go, "go.mod"),
        ];

        for (project_type, marker) in detections {
            let marker_path = self.project_path.join(marker);
            if !marker_path.exists() {
                continue;
            }
            let extracted = match project_type {
                ProjectType::NodeJs => self.extract_nodejs_metadata(&marker_path),
                ProjectType::Rust => self.extract_rust_metadata(&marker_path),
                ProjectType::Python => self.extract_python_metadata(&marker_path),
                ProjectType::Go => self.extract_go_metadata(&marker_path),
                ProjectType::Unknown => Ok((ProjectMetadata::default(), Vec::new())),
            };
            let (mut metadata, dependencies) = extracted.unwrap_or_else(|e| {
                warn!("could not read {}: {}", marker, e);
                (ProjectMetadata::default(), Vec::new())
            });
            metadata.marker_file = Some(marker.to_string());
            metadata.has_ci = self.has_ci();
            return (project_type, metadata, dependencies);
        }

        let metadata = ProjectMetadata {
            has_ci: self.has_ci(),
            ..Default::default()
        };
        (ProjectType::Unknown, metadata, Vec::new())
    }

    fn has_ci(&self) -> bool {
        self.project_path.join(".github/workflows").exists()
            || self.project_path.join(".gitlab-ci.yml").exists()
            || self.project_path.join(".circleci").exists()
    }

    /// Extract metadata from package.json
    fn extract_nodejs_metadata(
        &self,
        marker_path: &Path,
    ) -> AppResult<(ProjectMetadata, Vec<String>)> {
        let content = fs::read_to_string(marker_path)?;
        let json: serde_json::Value = serde_json::from_str(&content)?;

        let text = |key: &str| json.get(key).and_then(|v| v.as_str()).map(String::from);
        let mut metadata = ProjectMetadata {
            name: text("name"),
            version: text("version"),
            description: text("description"),
            ..Default::default()
        };

        let mut dependencies = Vec::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(deps) = json.get(section).and_then(|d| d.as_object()) {
                dependencies.extend(deps.keys().cloned());
            }
        }

        metadata.has_typescript = dependencies.iter().any(|d| d == "typescript")
            || self.project_path.join("tsconfig.json").exists();
        metadata.has_tests = json
            .get("scripts")
            .and_then(|s| s.get("test"))
            .is_some();
        metadata.test_framework = ["jest", "vitest", "mocha"]
            .iter()
            .find(|f| dependencies.iter().any(|d| d == *f))
            .map(|f| f.to_string());

        Ok((metadata, dependencies))
    }

    /// Extract metadata from Cargo.toml
    fn extract_rust_metadata(
        &self,
        marker_path: &Path,
    ) -> AppResult<(ProjectMetadata, Vec<String>)> {
        let content = fs::read_to_string(marker_path)?;
        let toml: toml::Value = content
            .parse()
            .map_err(|e| AppError::validation(format!("Failed to parse Cargo.toml: {}", e)))?;

        let mut metadata = ProjectMetadata::default();
        if let Some(package) = toml.get("package") {
            let text = |key: &str| package.get(key).and_then(|v| v.as_str()).map(String::from);
            metadata.name = text("name");
            metadata.version = text("version");
            metadata.description = text("description");
        }

        let mut dependencies = Vec::new();
        for section in ["dependencies", "dev-dependencies"] {
            if let Some(deps) = toml.get(section).and_then(|d| d.as_table()) {
                dependencies.extend(deps.keys().cloned());
            }
        }
        if let Some(deps) = toml
            .get("workspace")
            .and_then(|w| w.get("dependencies"))
            .and_then(|d| d.as_table())
        {
            dependencies.extend(deps.keys().cloned());
        }

        metadata.has_tests = true;
        metadata.test_framework = Some("cargo test".to_string());
        Ok((metadata, dependencies))
    }

    /// Extract metadata from Python project files
    fn extract_python_metadata(
        &self,
        marker_path: &Path,
    ) -> AppResult<(ProjectMetadata, Vec<String>)> {
        let mut metadata = ProjectMetadata::default();
        let mut dependencies = Vec::new();

        let marker_name = marker_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");

        if marker_name == "pyproject.toml" {
            let content = fs::read_to_string(marker_path)?;
            let toml: toml::Value = content.parse().map_err(|e| {
                AppError::validation(format!("Failed to parse pyproject.toml: {}", e))
            })?;

            let project = toml
                .get("project")
                .or_else(|| toml.get("tool").and_then(|t| t.get("poetry")));
            if let Some(project) = project {
                let text = |key: &str| project.get(key).and_then(|v| v.as_str()).map(String::from);
                metadata.name = text("name");
                metadata.version = text("version");
                metadata.description = text("description");

                match project.get("dependencies") {
                    Some(toml::Value::Array(items)) => dependencies.extend(
                        items
                            .iter()
                            .filter_map(|v| v.as_str())
                            .map(requirement_name),
                    ),
                    Some(toml::Value::Table(table)) => {
                        dependencies.extend(table.keys().map(|k| k.to_lowercase()))
                    }
                    _ => {}
                }
            }

            if toml.get("tool").and_then(|t| t.get("pytest")).is_some() {
                metadata.has_tests = true;
                metadata.test_framework = Some("pytest".to_string());
            }
        } else if marker_name == "requirements.txt" {
            let content = fs::read_to_string(marker_path)?;
            dependencies.extend(
                content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(requirement_name),
            );
        }

        if self.project_path.join("tests").exists() {
            metadata.has_tests = true;
            if metadata.test_framework.is_none() {
                metadata.test_framework = Some("pytest".to_string());
            }
        }

        Ok((metadata, dependencies))
    }

    /// Extract metadata from go.mod
    fn extract_go_metadata(&self, marker_path: &Path) -> AppResult<(ProjectMetadata, Vec<String>)> {
        let content = fs::read_to_string(marker_path)?;
        let mut metadata = ProjectMetadata::default();
        let mut dependencies = Vec::new();

        let mut in_require = false;
        for line in content.lines().map(str::trim) {
            if let Some(module) = line.strip_prefix("module ") {
                metadata.name = Some(module.trim().to_string());
            } else if line == "require (" {
                in_require = true;
            } else if in_require && line == ")" {
                in_require = false;
            } else if let Some(dep) = line.strip_prefix("require ") {
                dependencies.extend(dep.split_whitespace().next().map(String::from));
            } else if in_require {
                dependencies.extend(line.split_whitespace().next().map(String::from));
            }
        }

        metadata.has_tests = true;
        metadata.test_framework = Some("go test".to_string());
        Ok((metadata, dependencies))
    }

    fn should_skip_directory(name: &str) -> bool {
        name.starts_with('.')
            || matches!(
                name,
                "node_modules" | "target" | "dist" | "build" | "vendor" | "__pycache__" | "venv"
            )
    }

    /// Count source files by language. `top` is the top-level directory the
    /// walk is currently under.
    fn walk(&self, dir: &Path, level: u32, top: Option<usize>, analysis: &mut ProjectAnalysis) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skipping unreadable directory {}: {}", dir.display(), e);
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if Self::should_skip_directory(&name) || level + 1 > self.depth.max(1) {
                    continue;
                }
                let top = match top {
                    Some(index) => Some(index),
                    None => {
                        analysis.directories.push(DirectorySummary {
                            name: name.clone(),
                            file_count: 0,
                        });
                        Some(analysis.directories.len() - 1)
                    }
                };
                self.walk(&path, level + 1, top, analysis);
            } else if file_type.is_file() {
                if let Some(language) = language_for(&path) {
                    *analysis.languages.entry(language.to_string()).or_insert(0) += 1;
                    analysis.total_files += 1;
                    if let Some(index) = top {
                        analysis.directories[index].file_count += 1;
                    }
                }
            }
        }
    }
}

/// `"fastapi>=0.100"` → `"fastapi"`
fn requirement_name(requirement: &str) -> String {
    requirement.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .next()
        .unwrap_or("")
        .to_lowercase()
}

fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    let language = match ext {
        "rs" => "Rust",
        "ts" | "tsx" => "TypeScript",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "py" => "Python",
        "go" => "Go",
        "java" => "Java",
        "kt" => "Kotlin",
        "rb" => "Ruby",
        "cs" => "C#",
        "c" | "h" => "C",
        "cpp" | "cc" | "hpp" => "C++",
        "swift" => "Swift",
        _ => return None,
    };
    Some(language)
}

/// Analyze the project at `root`, descending at most `depth` directory levels.
pub fn analyze_project(root: impl AsRef<Path>, depth: u32) -> AppResult<ProjectAnalysis> {
    ProjectAnalyzer::new(root, depth).analyze()
}
