/// MCP Server Implementation
///
/// This module contains the transport side of the server:
/// - JSON-RPC 2.0 request/response structures
/// - Method routing shared by both transports
/// - HTTP server setup with Actix Web
/// - STDIO server reading one request per line
///
/// Tool execution itself is delegated to the `Dispatcher`.

use actix_web::{
    App, HttpResponse, HttpServer, Result, web,
    middleware::{Compress, DefaultHeaders, Logger},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::config::{Config, EnvCredentials, ToolContext};
use crate::core::dispatcher::Dispatcher;
use crate::core::error::BootstrapError;
use crate::core::registry::ToolRegistry;
use crate::tools;
use crate::tools::image_display::SystemViewer;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

/// Server state shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Server name as reported in MCP initialize responses
    pub server_name: String,
    /// Server version string as reported in MCP initialize responses
    pub server_version: String,
    pub dispatcher: Dispatcher,
}

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// `id` is absent for notifications.
#[derive(Deserialize, Debug)]
pub struct MCPRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC 2.0 response structure. Exactly one of `result` and `error` is set.
#[derive(Serialize, Debug)]
pub struct MCPResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<MCPError>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Serialize, Debug)]
pub struct MCPError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl MCPResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(MCPError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// Build the tool registry and dispatcher from configuration.
pub fn initialize_tools(config: Arc<Config>) -> Result<Dispatcher, BootstrapError> {
    let client = reqwest::Client::builder()
        .build()
        .map_err(BootstrapError::HttpClient)?;
    let ctx = ToolContext {
        config,
        credentials: Arc::new(EnvCredentials),
    };

    let mut registry = ToolRegistry::new();
    tools::register_all(&mut registry, &ctx, client, Arc::new(SystemViewer))?;

    Ok(Dispatcher::new(Arc::new(registry)))
}

/// Route one JSON-RPC request. Returns `None` for notifications.
pub async fn handle_request(state: &AppState, req: MCPRequest) -> Option<MCPResponse> {
    if req.id.is_none() {
        tracing::debug!(method = %req.method, "notification");
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(state, req.id),
        "ping" => MCPResponse::success(req.id, json!({})),
        "tools/list" => handle_tools_list(state, req.id),
        "tools/call" => handle_tools_call(state, req.id, req.params).await,
        _ => MCPResponse::failure(
            req.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };
    Some(response)
}

/// Handle MCP initialize method.
fn handle_initialize(state: &AppState, id: Option<Value>) -> MCPResponse {
    MCPResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": state.server_name,
                "version": state.server_version
            }
        }),
    )
}

/// Handle MCP tools/list method.
fn handle_tools_list(state: &AppState, id: Option<Value>) -> MCPResponse {
    MCPResponse::success(id, json!({ "tools": state.dispatcher.tools() }))
}

/// Handle MCP tools/call method.
///
/// Protocol errors are only raised for malformed params. Whatever happens
/// inside the tool comes back as a result envelope.
async fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> MCPResponse {
    let Some(params) = params else {
        return MCPResponse::failure(id, INVALID_PARAMS, "Invalid params");
    };

    let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
        return MCPResponse::failure(id, INVALID_PARAMS, "Invalid params: missing tool name");
    };

    let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    let result = state.dispatcher.invoke(tool_name, arguments).await;
    match serde_json::to_value(&result) {
        Ok(value) => MCPResponse::success(id, value),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize tool result");
            MCPResponse::failure(id, INTERNAL_ERROR, "Internal error")
        }
    }
}

/// Health check endpoint handler.
async fn health(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": state.server_name
    })))
}

/// MCP JSON-RPC request handler for HTTP mode.
async fn mcp_handler(state: web::Data<AppState>, req: web::Json<MCPRequest>) -> Result<HttpResponse> {
    match handle_request(&state, req.into_inner()).await {
        Some(response) => Ok(HttpResponse::Ok().json(response)),
        None => Ok(HttpResponse::Accepted().finish()),
    }
}

/// Run the MCP server in HTTP mode.
///
/// Worker count comes from configuration; connection limits and timeouts
/// are fixed.
pub async fn run_server_http(state: AppState, config: Arc<Config>) -> std::io::Result<()> {
    use std::time::Duration;

    let bind_addr = format!("{}:{}", config.host, config.port);
    let workers = config.workers;

    tracing::info!(
        name = %state.server_name,
        version = %state.server_version,
        %bind_addr,
        workers,
        "MCP server starting (HTTP mode)"
    );

    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY")),
            )
            .wrap(Logger::new("%r %s %Dms"))
            .route("/health", web::get().to(health))
            .route("/mcp", web::post().to(mcp_handler))
            .route("/", web::post().to(mcp_handler))
            .route("/", web::get().to(health))
    })
    .workers(workers)
    .keep_alive(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await
}

/// Run the MCP server in STDIO mode.
///
/// Reads JSON-RPC requests line by line from stdin and writes one response
/// line per request to stdout. Requests are handled one at a time.
pub async fn run_server_stdio(state: AppState) -> std::io::Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

    tracing::info!(
        name = %state.server_name,
        version = %state.server_version,
        "MCP server starting (STDIO mode)"
    );

    let stdin = tokio::io::stdin();
    let mut stdin = BufReader::with_capacity(8192, stdin).lines();
    let stdout = tokio::io::stdout();
    let mut stdout = BufWriter::with_capacity(8192, stdout);

    while let Some(line) = stdin.next_line().await? {
        let Some(response) = handle_line(&state, &line).await else {
            continue;
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                continue;
            }
        };

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Decode and route one STDIO line.
///
/// A line that is not JSON gets a parse error with a null `id`. JSON that is
/// not a request object gets an invalid-request error, echoing its `id` when
/// one is present.
async fn handle_line(state: &AppState, line: &str) -> Option<MCPResponse> {
    if line.trim().is_empty() {
        return None;
    }

    let value = match serde_json::from_str::<Value>(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable request line");
            return Some(MCPResponse::failure(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };

    let id = value.get("id").cloned();
    match serde_json::from_value::<MCPRequest>(value) {
        Ok(req) => handle_request(state, req).await,
        Err(e) => {
            tracing::warn!(error = %e, "malformed request");
            Some(MCPResponse::failure(
                id,
                INVALID_REQUEST,
                format!("Invalid Request: {}", e),
            ))
        }
    }
}
