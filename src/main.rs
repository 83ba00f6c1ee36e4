// Memory Bank - command-line entry point
//
// Logs go to stderr so stdout carries only command output.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use memory_bank::commands::{self, build_registry, GenerateArgs, ResolveArgs, ValidateArgs};
use memory_bank::models::settings::{SyncConfig, SyncConfigUpdate};
use memory_bank::services::resolver::{AutoApprove, DecisionSource, PromptDecisions};
use memory_bank::storage::ConfigService;
use memory_bank::utils::{resolve_project_root, sanitize_message};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Keep a Copilot memory bank and its instructions in sync")]
struct Cli {
    /// Config file to use instead of ~/.memory-bank/config.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a project and write its memory bank
    Generate {
        /// Project root (defaults to the current directory)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Directory levels to scan during analysis
        #[arg(long)]
        depth: Option<u32>,

        /// Only write the six core files
        #[arg(long, default_value_t = false)]
        flat: bool,

        /// Replace documents that already exist
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// Check memory bank structure and, with --sync, the instructions document
    Validate {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        #[arg(long, default_value_t = false)]
        sync: bool,

        /// Resolve conflicts found by --sync, prompting on the terminal
        #[arg(long, default_value_t = false, requires = "sync")]
        interactive: bool,
    },
    /// Bring the instructions document back in sync with the memory bank
    Resolve {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Accept the first option at every prompt
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,

        /// Skip per-file confirmation for low-impact changes
        #[arg(long, default_value_t = false)]
        auto: bool,
    },
    /// List tool definitions as JSON
    Tools,
    /// Read a JSON tool request from stdin and print the JSON response
    Call,
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Change individual settings and save them
    Set {
        #[arg(long)]
        analysis_depth: Option<u32>,

        #[arg(long)]
        semantic_organization: Option<bool>,

        #[arg(long)]
        auto_resolve: Option<bool>,

        /// Replace the low-impact file list (repeat for several files)
        #[arg(long = "low-impact-file", value_name = "FILE")]
        low_impact_files: Vec<String>,

        #[arg(long)]
        max_auto_resolvable: Option<usize>,

        #[arg(long)]
        high_severity_threshold: Option<usize>,
    },
    /// Restore the defaults and save them
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let service = load_config(cli.config.as_deref())?;
    let config = service.get_config_clone();

    match cli.command {
        Command::Generate {
            path,
            depth,
            flat,
            overwrite,
        } => {
            let args = GenerateArgs {
                project_root: project_root(path)?,
                semantic_organization: flat.then_some(false),
                analysis_depth: depth,
                overwrite,
            };
            run(commands::ToolRequest::GenerateMemoryBank(args), &config).await
        }
        Command::Validate {
            path,
            sync,
            interactive,
        } => {
            let root = project_root(path)?;
            let args = ValidateArgs {
                memory_bank_path: None,
                project_root: Some(root.clone()),
                sync_validation: sync,
                interactive_mode: interactive,
            };
            if interactive {
                let mut prompt = PromptDecisions::stdio();
                let report = commands::memory_bank::validate(&args, &config, &mut prompt)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.sanitized(Some(root.as_path()))))
                    .context("validation failed")?;
                print_json(&report)
            } else {
                run(commands::ToolRequest::ValidateMemoryBank(args), &config).await
            }
        }
        Command::Resolve { path, yes, auto } => {
            let root = project_root(path)?;
            let args = ResolveArgs {
                project_root: root.clone(),
                auto_resolve: auto.then_some(true),
                decisions: None,
            };
            let mut decisions: Box<dyn DecisionSource> = if yes {
                Box::new(AutoApprove)
            } else {
                Box::new(PromptDecisions::stdio())
            };
            let result = commands::memory_bank::resolve(&args, &config, decisions.as_mut())
                .await
                .map_err(|e| anyhow::anyhow!(e.sanitized(Some(root.as_path()))))
                .context("resolution failed")?;
            print_json(&result)
        }
        Command::Tools => print_json(&build_registry(&config).definitions()),
        Command::Call => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("failed to read request from stdin")?;
            let response = commands::dispatch_json(&payload, &config).await;
            print_json(&response)
        }
        Command::Config { action } => configure(service, action),
    }
}

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<ConfigService> {
    match path {
        Some(path) => ConfigService::from_path(path),
        None => ConfigService::new(),
    }
    .map_err(|e| anyhow::anyhow!(sanitize_message(&e.to_string(), None)))
    .context("failed to load configuration")
}

fn configure(mut service: ConfigService, action: ConfigAction) -> Result<()> {
    let saved = match action {
        ConfigAction::Show => return print_json(service.get_config()),
        ConfigAction::Set {
            analysis_depth,
            semantic_organization,
            auto_resolve,
            low_impact_files,
            max_auto_resolvable,
            high_severity_threshold,
        } => {
            let update = SyncConfigUpdate {
                low_impact_files: (!low_impact_files.is_empty()).then_some(low_impact_files),
                max_auto_resolvable,
                high_severity_threshold,
                semantic_organization,
                analysis_depth,
                auto_resolve,
            };
            service.update_config(update).map(|_| ())
        }
        ConfigAction::Reset => service.reset(),
    };
    saved
        .map_err(|e| anyhow::anyhow!(sanitize_message(&e.to_string(), None)))
        .context("failed to save configuration")?;
    info!(
        path = %sanitize_message(&service.path().display().to_string(), None),
        "configuration saved"
    );
    print_json(service.get_config())
}

fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| PathBuf::from("."));
    resolve_project_root(&path).map_err(|e| anyhow::anyhow!(e.to_string()))
}

/// Dispatch through the tool layer and fail the process on an error response
async fn run(request: commands::ToolRequest, config: &SyncConfig) -> Result<()> {
    let response = commands::dispatch(request, config).await;
    if let Some(error) = response.error {
        bail!(error);
    }
    print_json(&response.data)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
