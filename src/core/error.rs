/// Error Types
///
/// Every failure the server can observe is named here. Bootstrap errors
/// (configuration, registry) terminate the process; everything that happens
/// while serving a tool call is a `ToolError` and ends up as text in the
/// result envelope.

use thiserror::Error;

/// Invalid configuration discovered at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Tool registration failures. Only raised while the registry is being built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    Duplicate(String),
}

/// Anything that stops the server from starting. The process exits non-zero.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a single outbound provider call that did not produce a value.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS or TLS failure before a response arrived.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The provider returned a well-formed body carrying its own error.
    #[error("{0}")]
    Provider(String),
}

/// Failure reported by a tool handler.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Upstream data could not be obtained; the message is already user-facing.
    #[error("{0}")]
    Upstream(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    #[error("Execution failed: {0}")]
    Execution(String),
}
