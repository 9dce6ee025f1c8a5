/// Configuration and Environment Management
///
/// All settings come from environment variables and are read once at
/// startup. The image provider token is the exception: it is looked up on
/// every call so that a missing token only breaks that one tool.

use std::sync::Arc;

use crate::core::error::ConfigError;

pub const DEFAULT_NWS_API_BASE: &str = "https://api.weather.gov";
pub const DEFAULT_NWS_USER_AGENT: &str = "weather-app/1.0";
pub const DEFAULT_REPLICATE_API_BASE: &str = "https://api.replicate.com";
pub const REPLICATE_TOKEN_VAR: &str = "REPLICATE_API_TOKEN";

/// Which transports the server attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
    Both,
}

impl std::str::FromStr for TransportMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "both" => Ok(TransportMode::Both),
            other => Err(ConfigError::InvalidValue {
                key: "MCP_TRANSPORT_MODE".to_string(),
                message: format!("'{}' must be 'stdio', 'http', or 'both'", other),
            }),
        }
    }
}

/// Source of secret values needed by tools at call time.
pub trait CredentialSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads credentials from the process environment. Empty values count as unset.
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub transport: TransportMode,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub nws_api_base: String,
    pub nws_user_agent: String,
    pub replicate_api_base: String,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: "weather-tools-mcp".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            transport: TransportMode::Stdio,
            host: "127.0.0.1".to_string(),
            port: 3000,
            workers: num_cpus::get().clamp(1, 16),
            nws_api_base: DEFAULT_NWS_API_BASE.to_string(),
            nws_user_agent: DEFAULT_NWS_USER_AGENT.to_string(),
            replicate_api_base: DEFAULT_REPLICATE_API_BASE.to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        let transport = match lookup("MCP_TRANSPORT_MODE") {
            Some(mode) => mode.parse()?,
            None => defaults.transport,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{}': {}", raw, e),
            })?,
            None => defaults.port,
        };

        let workers = match lookup("WORKER_THREADS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "WORKER_THREADS".to_string(),
                        message: format!("'{}' must be a positive integer", raw),
                    });
                }
            },
            None => defaults.workers,
        };

        let json_logs = lookup("MCP_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            server_name: var("SERVER_NAME", defaults.server_name),
            server_version: var("SERVER_VERSION", defaults.server_version),
            transport,
            host: var("HOST", defaults.host),
            port,
            workers,
            nws_api_base: trim_base(var("NWS_API_BASE", defaults.nws_api_base)),
            nws_user_agent: var("NWS_USER_AGENT", defaults.nws_user_agent),
            replicate_api_base: trim_base(var("REPLICATE_API_BASE", defaults.replicate_api_base)),
            json_logs,
        })
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Shared dependencies handed to every tool at registration time.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<Config>,
    pub credentials: Arc<dyn CredentialSource>,
}
