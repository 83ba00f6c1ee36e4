//! Tool Registry
//!
//! Registers the three operations as `MemoryBankTool`s so callers can list
//! their schemas and execute them by name.

use std::sync::Arc;

use async_trait::async_trait;
use memory_bank_core::{CoreError, CoreResult, ToolDefinition, ToolExecutable, ToolRegistry};
use serde_json::{json, Value};

use crate::commands::execute;
use crate::commands::request::ToolRequest;
use crate::models::settings::SyncConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Validate,
    Resolve,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Self::Generate, Self::Validate, Self::Resolve];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generate => "generate_memory_bank",
            Self::Validate => "validate_memory_bank",
            Self::Resolve => "resolve_sync_conflicts",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Generate => {
                "Analyze a project and generate its memory bank under .github/memory-bank, \
                 adding a managed section to the Copilot instructions when none exists."
            }
            Self::Validate => {
                "Check the six core memory bank documents and, optionally, whether the \
                 Copilot instructions reference exactly the files that exist."
            }
            Self::Resolve => {
                "Bring the Copilot instructions back in sync with the memory bank by adding \
                 missing references and removing stale ones."
            }
        }
    }

    fn schema(&self) -> Value {
        match self {
            Self::Generate => json!({
                "type": "object",
                "properties": {
                    "projectRoot": { "type": "string" },
                    "semanticOrganization": { "type": "boolean" },
                    "analysisDepth": { "type": "integer", "minimum": 1, "maximum": 10 },
                    "overwrite": { "type": "boolean", "default": false }
                },
                "required": ["projectRoot"],
                "additionalProperties": false
            }),
            Self::Validate => json!({
                "type": "object",
                "properties": {
                    "memoryBankPath": { "type": "string" },
                    "projectRoot": { "type": "string" },
                    "syncValidation": { "type": "boolean", "default": false },
                    "interactiveMode": { "type": "boolean", "default": false }
                },
                "additionalProperties": false
            }),
            Self::Resolve => json!({
                "type": "object",
                "properties": {
                    "projectRoot": { "type": "string" },
                    "autoResolve": { "type": "boolean" },
                    "decisions": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["projectRoot"],
                "additionalProperties": false
            }),
        }
    }
}

/// One operation bound to a configuration
pub struct OperationTool {
    operation: Operation,
    config: SyncConfig,
}

impl OperationTool {
    pub fn new(operation: Operation, config: SyncConfig) -> Self {
        Self { operation, config }
    }
}

impl ToolDefinition for OperationTool {
    fn name(&self) -> &str {
        self.operation.name()
    }

    fn description(&self) -> &str {
        self.operation.description()
    }

    fn parameters_schema(&self) -> Value {
        self.operation.schema()
    }

    fn mutates_files(&self) -> bool {
        !matches!(self.operation, Operation::Validate)
    }
}

#[async_trait]
impl ToolExecutable for OperationTool {
    async fn execute(&self, args: Value) -> CoreResult<Value> {
        let request: ToolRequest =
            serde_json::from_value(json!({ "tool": self.operation.name(), "arguments": args }))
                .map_err(|e| CoreError::validation(format!("Invalid arguments: {}", e)))?;
        Ok(execute(request, &self.config).await?)
    }
}

/// Registry holding every operation
pub fn build_registry(config: &SyncConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for operation in Operation::ALL {
        registry.register(Arc::new(OperationTool::new(operation, config.clone())));
    }
    registry
}
