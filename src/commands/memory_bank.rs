//! Memory Bank Commands
//!
//! Handlers behind the three exposed operations. Each takes typed arguments
//! plus the loaded configuration and returns serializable results.

use memory_bank_core::memory_bank_dir;
use memory_bank_validation::{
    check_sync, validate_with_scanner, ValidateOptions, ValidationResult,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commands::request::{GenerateArgs, ResolveArgs, ValidateArgs};
use crate::models::generation::{GenerateOptions, GenerationResult};
use crate::models::resolution::{PriorSync, ResolutionResult};
use crate::models::settings::SyncConfig;
use crate::services::generator::generate_memory_bank;
use crate::services::resolver::{
    perform_interactive_sync_resolution, DecisionSource, ResolveOptions,
};
use crate::utils::error::{AppError, AppResult};

/// Validation result, plus the resolution run when `interactiveMode` was set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    #[serde(flatten)]
    pub validation: ValidationResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionResult>,
}

/// Resolver settings from config; the same scanner serves the pre-check.
fn resolve_options(config: &SyncConfig, auto_resolve: Option<bool>) -> ResolveOptions {
    ResolveOptions {
        auto_resolve: auto_resolve.unwrap_or(config.auto_resolve),
        policy: config.policy.clone(),
        ..Default::default()
    }
}

/// Generate the memory bank and managed instructions section
pub async fn generate(args: &GenerateArgs, config: &SyncConfig) -> AppResult<GenerationResult> {
    let options = GenerateOptions {
        semantic_organization: args
            .semantic_organization
            .unwrap_or(config.semantic_organization),
        overwrite: args.overwrite,
    };
    let depth = args.analysis_depth.unwrap_or(config.analysis_depth);
    generate_memory_bank(&args.project_root, depth, &options).await
}

/// Validate a memory bank; with `interactiveMode`, resolve any sync conflict
/// using `decisions`
pub async fn validate(
    args: &ValidateArgs,
    config: &SyncConfig,
    decisions: &mut dyn DecisionSource,
) -> AppResult<ValidationReport> {
    let memory_bank = args
        .memory_bank()
        .ok_or_else(|| {
            AppError::validation("either memoryBankPath or projectRoot is required")
        })?;
    let options = ValidateOptions {
        sync_validation: args.sync_validation,
        project_root: args.root(),
        interactive_mode: args.interactive_mode,
    };

    let resolve_options = resolve_options(config, None);
    let validation = validate_with_scanner(
        &memory_bank,
        &options,
        &config.policy,
        resolve_options.scanner.as_ref(),
    )
    .await;

    let resolution = match (args.interactive_mode, options.project_root.as_deref()) {
        (true, Some(root)) => {
            let prior = PriorSync::from_sync(validation.copilot_sync.as_ref());
            let result = perform_interactive_sync_resolution(
                &memory_bank,
                root,
                prior,
                &resolve_options,
                decisions,
            )
            .await?;
            Some(result)
        }
        _ => None,
    };

    Ok(ValidationReport {
        validation,
        resolution,
    })
}

/// Run sync checking and the resolver for a project
pub async fn resolve(
    args: &ResolveArgs,
    config: &SyncConfig,
    decisions: &mut dyn DecisionSource,
) -> AppResult<ResolutionResult> {
    let memory_bank = memory_bank_dir(&args.project_root);
    let options = resolve_options(config, args.auto_resolve);
    let sync = check_sync(
        &memory_bank,
        &args.project_root,
        &options.policy,
        options.scanner.as_ref(),
    )
    .await?;
    debug!(in_sync = sync.is_in_sync, "sync checked before resolution");

    perform_interactive_sync_resolution(
        &memory_bank,
        &args.project_root,
        PriorSync::from_sync(Some(&sync)),
        &options,
        decisions,
    )
    .await
}
