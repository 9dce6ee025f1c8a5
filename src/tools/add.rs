/// Add Tool
///
/// Adds two numbers. Has no external dependencies, which makes it the
/// simplest way to check that a client can reach the server at all.

use futures_util::FutureExt;

use crate::core::error::{RegistryError, ToolError};
use crate::core::registry::{MCPTool, ToolHandler, ToolRegistry};
use crate::core::schema::{InputSchema, ParamDef, ToolArgs};

pub const NAME: &str = "add";

pub fn add(a: f64, b: f64) -> String {
    format!("The sum of {} and {} is {}", a, b, a + b)
}

/// Register the add tool with the tool registry.
pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    let tool = MCPTool {
        name: NAME.to_string(),
        description: "Add two numbers".to_string(),
        input_schema: InputSchema::new()
            .param(ParamDef::number("a", "First number"))
            .param(ParamDef::number("b", "Second number")),
    };

    let handler: ToolHandler = Box::new(|args: ToolArgs| {
        let result = match (args.f64("a"), args.f64("b")) {
            (Some(a), Some(b)) => Ok(add(a, b)),
            _ => Err(ToolError::InvalidArguments("a and b are required".to_string())),
        };
        async move { result }.boxed()
    });

    registry.register(tool, handler)
}
