/// Tool Dispatcher
///
/// Single entry point for `tools/call`. Looks the tool up, validates the raw
/// arguments, runs the handler and folds every possible failure (unknown
/// tool, bad arguments, handler error, handler panic) into a text envelope.

use futures_util::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::core::envelope::CallToolResult;
use crate::core::registry::{ToolDescriptor, ToolRegistry};

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn tools(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Invoke a tool by name. Always yields an envelope.
    pub async fn invoke(&self, name: &str, args: Value) -> CallToolResult {
        let Some(operation) = self.registry.lookup(name) else {
            tracing::warn!(tool = %name, "call to unknown tool");
            return CallToolResult::error(format!("Unknown tool: {}", name));
        };

        let validated = match operation.tool.input_schema.validate(&args) {
            Ok(validated) => validated,
            Err(errors) => {
                tracing::debug!(tool = %name, ?errors, "rejected tool arguments");
                return CallToolResult::error(format!(
                    "Invalid arguments for tool {}: {}",
                    name,
                    errors.join("; ")
                ));
            }
        };

        tracing::debug!(tool = %name, "dispatching tool call");
        let outcome = AssertUnwindSafe(async { (operation.handler)(validated).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(text)) => CallToolResult::text(text),
            Ok(Err(e)) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                CallToolResult::error(e.to_string())
            }
            Err(_) => {
                tracing::error!(tool = %name, "tool handler panicked");
                CallToolResult::error(format!(
                    "Error: tool {} failed unexpectedly and produced no result",
                    name
                ))
            }
        }
    }
}
