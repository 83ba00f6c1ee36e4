//! Memory Bank Templates
//!
//! Turns a [`ProjectAnalysis`] into markdown prose. Pure text in, text out.

use memory_bank_core::SEMANTIC_FOLDERS;

use crate::models::generation::{ProjectAnalysis, ProjectType};

fn bullet_list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("- {}\n", empty);
    }
    items.iter().map(|i| format!("- {}\n", i)).collect()
}

fn languages(analysis: &ProjectAnalysis) -> Vec<String> {
    let mut langs: Vec<(&String, &usize)> = analysis.languages.iter().collect();
    langs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    langs
        .into_iter()
        .map(|(lang, count)| format!("{} ({} files)", lang, count))
        .collect()
}

fn directories(analysis: &ProjectAnalysis) -> Vec<String> {
    analysis
        .directories
        .iter()
        .map(|d| format!("`{}/` ({} source files)", d.name, d.file_count))
        .collect()
}

fn project_kind(analysis: &ProjectAnalysis) -> String {
    match (analysis.project_type, analysis.primary_language()) {
        (ProjectType::Unknown, Some(lang)) => format!("{} project", lang),
        (ProjectType::Unknown, None) => "software project".to_string(),
        (t, _) => format!("{} project", t.display_name()),
    }
}

pub fn project_brief(analysis: &ProjectAnalysis) -> String {
    let description = analysis
        .metadata
        .description
        .clone()
        .unwrap_or_else(|| format!("{} is a {}.", analysis.project_name, project_kind(analysis)));
    format!(
        "# Project Brief\n\n\
         ## Overview\n\n{}\n\n\
         ## Core Requirements\n\n\
         - Keep the codebase buildable and tested at every step\n\
         - Preserve the existing module boundaries unless a change is agreed\n\
         - Document decisions in this memory bank as they are made\n\n\
         ## Project Facts\n\n\
         - Name: {}\n\
         - Type: {}\n\
         - Version: {}\n\
         - Source files analyzed: {}\n",
        description,
        analysis.project_name,
        project_kind(analysis),
        analysis.metadata.version.as_deref().unwrap_or("unversioned"),
        analysis.total_files,
    )
}

pub fn product_context(analysis: &ProjectAnalysis) -> String {
    let surface = if analysis.has_api {
        "It exposes a network API, so request and response contracts matter to its users."
    } else {
        "It has no detected network API; users interact with it as a library, tool or application."
    };
    format!(
        "# Product Context\n\n\
         ## Why This Project Exists\n\n\
         {} exists to solve a concrete problem for its users. Record that problem here \
         in one or two sentences once it is agreed.\n\n\
         ## How It Should Work\n\n{}\n\n\
         ## User Experience Goals\n\n\
         - Predictable behavior with clear error messages\n\
         - Fast feedback for common workflows\n",
        analysis.project_name, surface,
    )
}

pub fn active_context(analysis: &ProjectAnalysis) -> String {
    format!(
        "# Active Context\n\n\
         ## Current Focus\n\n\
         Memory bank initialized for {}. Replace this paragraph with the work in progress.\n\n\
         ## Recent Changes\n\n\
         - Generated the initial memory bank from project analysis\n\n\
         ## Next Steps\n\n\
         - Review the generated documents and correct anything the analysis got wrong\n\
         - Record the current task and open decisions here\n",
        analysis.project_name,
    )
}

pub fn system_patterns(analysis: &ProjectAnalysis) -> String {
    format!(
        "# System Patterns\n\n\
         ## Architecture\n\n\
         Top-level layout:\n\n{}\n\
         ## Key Technical Decisions\n\n{}\n\
         ## Design Patterns\n\n\
         Document recurring patterns (error handling, module boundaries, data flow) as they \
         are identified.\n",
        bullet_list(&directories(analysis), "No source directories detected"),
        bullet_list(&analysis.frameworks, "No frameworks detected from the manifest"),
    )
}

pub fn tech_context(analysis: &ProjectAnalysis) -> String {
    let tooling = [
        analysis
            .metadata
            .test_framework
            .as_ref()
            .map(|t| format!("Tests: {}", t)),
        analysis
            .metadata
            .marker_file
            .as_ref()
            .map(|m| format!("Manifest: `{}`", m)),
        analysis.metadata.has_typescript.then(|| "TypeScript enabled".to_string()),
        analysis.metadata.has_ci.then(|| "Continuous integration configured".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();

    format!(
        "# Tech Context\n\n\
         ## Languages\n\n{}\n\
         ## Frameworks and Libraries\n\n{}\n\
         ## Development Setup\n\n{}\n\
         ## Constraints\n\n\
         Record platform, performance and compatibility constraints here.\n",
        bullet_list(&languages(analysis), "No source files detected"),
        bullet_list(&analysis.frameworks, "None detected"),
        bullet_list(&tooling, "No tooling detected"),
    )
}

pub fn progress(analysis: &ProjectAnalysis) -> String {
    format!(
        "# Progress\n\n\
         ## What Works\n\n\
         - Project structure analyzed ({} source files)\n\
         - Memory bank generated\n\n\
         ## What's Left to Build\n\n\
         - Fill in product goals and current priorities\n\n\
         ## Known Issues\n\n\
         - None recorded yet\n",
        analysis.total_files,
    )
}

/// Content of one of the six core files, or `None` for an unknown name.
pub fn render_core(name: &str, analysis: &ProjectAnalysis) -> Option<String> {
    let content = match name {
        "projectbrief.md" => project_brief(analysis),
        "productContext.md" => product_context(analysis),
        "activeContext.md" => active_context(analysis),
        "systemPatterns.md" => system_patterns(analysis),
        "techContext.md" => tech_context(analysis),
        "progress.md" => progress(analysis),
        _ => return None,
    };
    Some(content)
}

/// Document for one semantic folder, as `(file name, content)`, when the
/// analysis gives that folder something to say.
fn semantic_document(folder: &str, analysis: &ProjectAnalysis) -> Option<(&'static str, String)> {
    let doc = match folder {
        "features" => (
            "overview.md",
            format!(
                "# Features\n\n\
                 Feature inventory for {}. Add one document per feature in this folder as \
                 features are designed.\n\n\
                 ## Areas\n\n{}",
                analysis.project_name,
                bullet_list(&directories(analysis), "No source directories detected"),
            ),
        ),
        "api" if analysis.has_api => (
            "overview.md",
            "# API\n\n\
             Describe endpoints, request and response shapes, authentication and versioning.\n"
                .to_string(),
        ),
        "integrations" if !analysis.frameworks.is_empty() => (
            "dependencies.md",
            format!(
                "# Dependencies\n\n\
                 Notable libraries and the reason each is used:\n\n{}",
                bullet_list(&analysis.frameworks, ""),
            ),
        ),
        "deployment" if analysis.has_deployment || analysis.metadata.has_ci => (
            "overview.md",
            format!(
                "# Deployment\n\n\
                 - Continuous integration: {}\n\
                 - Container or cluster descriptors: {}\n",
                if analysis.metadata.has_ci { "yes" } else { "no" },
                if analysis.has_deployment { "yes" } else { "no" },
            ),
        ),
        "testing" if analysis.metadata.has_tests => (
            "strategy.md",
            format!(
                "# Testing Strategy\n\n\
                 - Runner: {}\n\
                 - Keep tests next to the code they cover and run them before every change.\n",
                analysis
                    .metadata
                    .test_framework
                    .as_deref()
                    .unwrap_or("not detected"),
            ),
        ),
        "security" if analysis.has_api => (
            "overview.md",
            "# Security\n\n\
             Record how callers authenticate, where secrets are stored and which inputs \
             cross a trust boundary.\n"
                .to_string(),
        ),
        "performance" if analysis.has_api && analysis.has_deployment => (
            "budgets.md",
            format!(
                "# Performance\n\n\
                 Latency and throughput targets for the deployed {} service, and how they \
                 are measured.\n",
                analysis.project_name,
            ),
        ),
        _ => return None,
    };
    Some(doc)
}

/// Additional documents for semantic organization, as
/// `(path relative to the memory-bank root, content)`, in folder order.
pub fn semantic_documents(analysis: &ProjectAnalysis) -> Vec<(String, String)> {
    SEMANTIC_FOLDERS
        .iter()
        .filter_map(|folder| {
            semantic_document(folder, analysis)
                .map(|(name, content)| (format!("{}/{}", folder, name), content))
        })
        .collect()
}
