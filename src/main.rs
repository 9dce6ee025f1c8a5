/// MCP Server Entry Point
///
/// Loads configuration from the environment, builds the tool registry and
/// attaches the configured transports.
///
/// Environment Variables:
/// - SERVER_NAME / SERVER_VERSION: reported in `initialize`
/// - MCP_TRANSPORT_MODE: "stdio", "http", or "both" (default: "stdio")
/// - HOST / PORT: bind address for HTTP mode (default: 127.0.0.1:3000)
/// - WORKER_THREADS: HTTP worker count (default: CPU count, max 16)
/// - NWS_API_BASE / NWS_USER_AGENT: weather provider settings
/// - REPLICATE_API_BASE / REPLICATE_API_TOKEN: image provider settings
/// - MCP_LOG_FORMAT: "json" for JSON log lines on stderr
/// - RUST_LOG: log filter (default: info)

mod core;
mod tools;

use std::process::ExitCode;
use std::sync::Arc;

use crate::core::config::{Config, TransportMode};
use crate::core::error::BootstrapError;
use crate::core::{logging, server};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BootstrapError> {
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            logging::init_tracing(false);
            return Err(e.into());
        }
    };
    logging::init_tracing(config.json_logs);

    let dispatcher = server::initialize_tools(config.clone())?;
    let state = server::AppState {
        server_name: config.server_name.clone(),
        server_version: config.server_version.clone(),
        dispatcher,
    };

    match config.transport {
        TransportMode::Stdio => server::run_server_stdio(state).await?,
        TransportMode::Http => server::run_server_http(state, config).await?,
        TransportMode::Both => {
            // STDIO in the background, HTTP in the foreground
            let stdio_state = state.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = server::run_server_stdio(stdio_state).await {
                    tracing::error!(error = %e, "STDIO server error");
                }
            });

            let http_result = server::run_server_http(state, config).await;
            stdio_handle.abort();
            http_result?;
        }
    }

    Ok(())
}
