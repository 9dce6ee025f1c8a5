/// Tool Registry
///
/// Maps tool names to their definition and handler. The registry is filled
/// once during startup, then frozen behind an `Arc` and only read from.

use futures_util::future::BoxFuture;
use serde::Serialize;
use std::collections::HashMap;

use crate::core::error::{RegistryError, ToolError};
use crate::core::schema::{InputSchema, ToolArgs};

/// Tool definition as advertised to clients.
#[derive(Debug, Clone)]
pub struct MCPTool {
    /// Unique tool identifier (e.g., "get-alerts")
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// Parameters accepted by the tool
    pub input_schema: InputSchema,
}

/// Wire form of a tool in `tools/list`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Tool handler function type.
///
/// Handlers receive arguments that already passed schema validation and
/// resolve to the text of the result or a `ToolError`.
pub type ToolHandler =
    Box<dyn Fn(ToolArgs) -> BoxFuture<'static, Result<String, ToolError>> + Send + Sync>;

/// A registered tool: its definition plus the code that runs it.
pub struct Operation {
    pub tool: MCPTool,
    pub handler: ToolHandler,
}

/// Registry of available tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    operations: Vec<Operation>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: MCPTool, handler: ToolHandler) -> Result<(), RegistryError> {
        if self.index.contains_key(&tool.name) {
            return Err(RegistryError::Duplicate(tool.name));
        }
        tracing::debug!(tool = %tool.name, "registered tool");
        self.index.insert(tool.name.clone(), self.operations.len());
        self.operations.push(Operation { tool, handler });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Operation> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Definitions for `tools/list`, in registration order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.operations
            .iter()
            .map(|op| ToolDescriptor {
                name: op.tool.name.clone(),
                description: op.tool.description.clone(),
                input_schema: op.tool.input_schema.to_json_schema(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::ParamDef;
    use futures_util::FutureExt;

    fn tool(name: &str) -> MCPTool {
        MCPTool {
            name: name.to_string(),
            description: format!("{name} tool"),
            input_schema: InputSchema::new().param(ParamDef::string("message", "Message")),
        }
    }

    fn noop() -> ToolHandler {
        Box::new(|_args: ToolArgs| async { Ok::<_, ToolError>("ok".to_string()) }.boxed())
    }

    #[test]
    fn lookup_finds_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("first"), noop()).unwrap();

        assert!(registry.lookup("first").is_some());
        assert!(registry.lookup("second").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("first"), noop()).unwrap();

        let err = registry.register(tool("first"), noop()).unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("first".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn descriptors_keep_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("zeta"), noop()).unwrap();
        registry.register(tool("alpha"), noop()).unwrap();

        let names: Vec<String> = registry.descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let wire = serde_json::to_value(&registry.descriptors()[0]).unwrap();
        assert_eq!(wire["inputSchema"]["required"], serde_json::json!(["message"]));
    }
}
