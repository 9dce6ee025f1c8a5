/// Weather Alerts Tool
///
/// `get-alerts` lists active National Weather Service alerts for a US state.

use futures_util::FutureExt;
use std::sync::Arc;

use crate::core::error::{RegistryError, ToolError};
use crate::core::http::HttpFetcher;
use crate::core::registry::{MCPTool, ToolHandler, ToolRegistry};
use crate::core::schema::{InputSchema, ParamDef, ToolArgs};
use crate::tools::weather::{AlertProperties, AlertsResponse, format_alert, format_report};

pub const NAME: &str = "get-alerts";

pub struct AlertsTool {
    api_base: String,
    fetcher: HttpFetcher,
}

impl AlertsTool {
    pub fn new(api_base: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            api_base: api_base.into(),
            fetcher,
        }
    }

    pub async fn run(&self, state: &str) -> Result<String, ToolError> {
        let state = state.to_uppercase();
        let url = format!("{}/alerts?area={}", self.api_base, state);

        let data: AlertsResponse = self.fetcher.get_json(&url).await.map_err(|e| {
            tracing::warn!(%state, error = %e, "alerts request failed");
            ToolError::Upstream("Failed to retrieve alerts data".to_string())
        })?;

        if data.features.is_empty() {
            return Ok(format!("No active alerts for {}", state));
        }

        let alerts: Vec<AlertProperties> =
            data.features.into_iter().map(|f| f.properties).collect();
        Ok(format_report(
            &format!("Active alerts for {}", state),
            &alerts,
            format_alert,
        ))
    }
}

pub fn register(registry: &mut ToolRegistry, tool: AlertsTool) -> Result<(), RegistryError> {
    let definition = MCPTool {
        name: NAME.to_string(),
        description: "Get weather alerts for a state".to_string(),
        input_schema: InputSchema::new().param(
            ParamDef::string("state", "Two-letter state code (e.g. CA, NY)").length(2, Some(2)),
        ),
    };

    let tool = Arc::new(tool);
    let handler: ToolHandler = Box::new(move |args: ToolArgs| {
        let tool = tool.clone();
        async move {
            let state = args
                .str("state")
                .ok_or_else(|| ToolError::InvalidArguments("state is required".to_string()))?;
            tool.run(state).await
        }
        .boxed()
    });

    registry.register(definition, handler)
}
