//! Tool Trait
//!
//! Named-operation abstraction consumed by the outer dispatch layer, with
//! split definition/execution traits:
//!
//! - `ToolDefinition` - Identity, schema, mutation flag
//! - `ToolExecutable` - Execution capability
//! - `MemoryBankTool` - Combined trait (auto-implemented via blanket impl)
//! - `ToolRegistry` - O(1) lookup registry with ordered iteration

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

// ============================================================================
// Trait Definitions
// ============================================================================

/// Tool definition metadata trait.
pub trait ToolDefinition: Send + Sync {
    /// Unique name of this tool (e.g., "validate_memory_bank").
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// JSON schema describing input parameters (draft-07).
    fn parameters_schema(&self) -> Value;

    /// Whether the tool may write to the memory bank or the instructions document.
    fn mutates_files(&self) -> bool {
        false
    }
}

/// Tool execution trait.
#[async_trait]
pub trait ToolExecutable: Send + Sync {
    /// Execute the tool with JSON arguments matching `parameters_schema()`.
    ///
    /// Implementations must reject malformed arguments with
    /// `CoreError::Validation` before touching the filesystem.
    async fn execute(&self, args: Value) -> CoreResult<Value>;
}

/// Combined trait for tools that provide both definition and execution.
pub trait MemoryBankTool: ToolDefinition + ToolExecutable {}

impl<T: ToolDefinition + ToolExecutable> MemoryBankTool for T {}

// ============================================================================
// ToolRegistry
// ============================================================================

/// Registry of `MemoryBankTool` implementations.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn MemoryBankTool>>,
    /// Insertion order for deterministic iteration.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn MemoryBankTool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn MemoryBankTool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool definitions as JSON values in registration order.
    pub fn definitions(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| {
                serde_json::json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.parameters_schema(),
                    "mutatesFiles": tool.mutates_files(),
                })
            })
            .collect()
    }

    /// Execute a tool by name.
    ///
    /// Returns `Err(CoreError::NotFound)` if the tool is not registered.
    pub async fn execute(&self, name: &str, args: Value) -> CoreResult<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(CoreError::not_found(format!("Tool not found: {}", name))),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    impl ToolDefinition for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        fn parameters_schema(&self) -> Value {
            serde_json::json!({
                "type": "object",
                "properties": { "input": { "type": "string" } },
                "required": ["input"]
            })
        }
    }

    #[async_trait]
    impl ToolExecutable for EchoTool {
        async fn execute(&self, args: Value) -> CoreResult<Value> {
            let input = args
                .get("input")
                .and_then(|v| v.as_str())
                .ok_or_else(|| CoreError::validation("input is required"))?;
            Ok(Value::String(input.to_string()))
        }
    }

    struct WriterTool;

    impl ToolDefinition for WriterTool {
        fn name(&self) -> &str {
            "writer"
        }

        fn description(&self) -> &str {
            "Pretends to write"
        }

        fn parameters_schema(&self) -> Value {
            serde_json::json!({"type": "object"})
        }

        fn mutates_files(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl ToolExecutable for WriterTool {
        async fn execute(&self, _args: Value) -> CoreResult<Value> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(WriterTool));
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(WriterTool));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["writer", "echo"]);
        assert!(registry.contains("echo"));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_definitions_carry_schema_and_flag() {
        let mut registry = ToolRegistry::default();
        registry.register(Arc::new(EchoTool));
        registry.register(Arc::new(WriterTool));

        let defs = registry.definitions();
        assert_eq!(defs[0]["name"], "echo");
        assert_eq!(defs[0]["mutatesFiles"], false);
        assert_eq!(defs[0]["inputSchema"]["required"][0], "input");
        assert_eq!(defs[1]["mutatesFiles"], true);
    }

    #[tokio::test]
    async fn test_execute_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let out = registry
            .execute("echo", serde_json::json!({"input": "hi"}))
            .await
            .unwrap();
        assert_eq!(out, Value::String("hi".into()));

        let err = registry.execute("echo", Value::Null).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("nope", Value::Null).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
