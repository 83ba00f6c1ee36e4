//! Tool Commands
//!
//! Outer dispatch layer: typed requests in, `CommandResponse` envelopes out.
//! Errors are sanitized here so no absolute system path leaves the process.

pub mod memory_bank;
pub mod registry;
pub mod request;

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::response::CommandResponse;
use crate::models::settings::SyncConfig;
use crate::services::resolver::{AutoApprove, ScriptedDecisions};
use crate::utils::error::AppResult;

pub use memory_bank::ValidationReport;
pub use registry::{build_registry, Operation, OperationTool};
pub use request::{GenerateArgs, ResolveArgs, ToolRequest, ValidateArgs};

/// Validate and run a request, approving every resolver prompt unless the
/// request scripts its own answers.
pub async fn execute(request: ToolRequest, config: &SyncConfig) -> AppResult<Value> {
    request.validate()?;

    let value = match request {
        ToolRequest::GenerateMemoryBank(args) => {
            serde_json::to_value(memory_bank::generate(&args, config).await?)?
        }
        ToolRequest::ValidateMemoryBank(args) => {
            serde_json::to_value(memory_bank::validate(&args, config, &mut AutoApprove).await?)?
        }
        ToolRequest::ResolveSyncConflicts(args) => {
            let result = match &args.decisions {
                Some(answers) => {
                    let mut scripted = ScriptedDecisions::new(answers.clone());
                    let result = memory_bank::resolve(&args, config, &mut scripted).await?;
                    if scripted.remaining() > 0 {
                        debug!(unused = scripted.remaining(), "scripted decisions left over");
                    }
                    result
                }
                None => memory_bank::resolve(&args, config, &mut AutoApprove).await?,
            };
            serde_json::to_value(result)?
        }
    };
    Ok(value)
}

/// Run a request and wrap the outcome in a response envelope
pub async fn dispatch(request: ToolRequest, config: &SyncConfig) -> CommandResponse<Value> {
    let tool = request.name();
    let project_root = request.project_root();

    match execute(request, config).await {
        Ok(value) => CommandResponse::ok(value),
        Err(e) => {
            let message = e.sanitized(project_root.as_deref());
            warn!(tool, "tool call failed: {}", message);
            CommandResponse::err(message)
        }
    }
}

/// Parse a JSON request and dispatch it; malformed payloads become error
/// responses
pub async fn dispatch_json(payload: &str, config: &SyncConfig) -> CommandResponse<Value> {
    match ToolRequest::from_json(payload) {
        Ok(request) => dispatch(request, config).await,
        Err(e) => CommandResponse::err(e.sanitized(None)),
    }
}
