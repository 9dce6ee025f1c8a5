/// Core Server Framework Module
///
/// - server.rs: JSON-RPC routing plus the HTTP and STDIO transports
/// - dispatcher.rs / registry.rs / schema.rs: tool lookup, validation, invocation
/// - envelope.rs: the `tools/call` result shape
/// - http.rs: outbound provider calls
/// - config.rs / error.rs / logging.rs: ambient plumbing

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod http;
pub mod logging;
pub mod registry;
pub mod schema;
pub mod server;

#[cfg(test)]
pub mod testing;
