/// Tools Module
///
/// Each tool lives in its own module and exports a `register` function.
/// `register_all` wires every tool to its provider settings.

pub mod add;
pub mod alerts;
pub mod forecast;
pub mod image_display;
pub mod image_gen;
pub mod weather;

use std::sync::Arc;

use crate::core::config::ToolContext;
use crate::core::error::RegistryError;
use crate::core::http::HttpFetcher;
use crate::core::registry::ToolRegistry;
use image_display::ImageViewer;

const GEO_JSON: &str = "application/geo+json";
const JSON: &str = "application/json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Register every tool the server exposes.
pub fn register_all(
    registry: &mut ToolRegistry,
    ctx: &ToolContext,
    client: reqwest::Client,
    viewer: Arc<dyn ImageViewer>,
) -> Result<(), RegistryError> {
    let config = &ctx.config;
    let weather = HttpFetcher::new(client.clone(), &config.nws_user_agent, GEO_JSON);
    let replicate = HttpFetcher::new(client, USER_AGENT, JSON);

    alerts::register(
        registry,
        alerts::AlertsTool::new(config.nws_api_base.clone(), weather.clone()),
    )?;
    forecast::register(
        registry,
        forecast::ForecastTool::new(config.nws_api_base.clone(), weather),
    )?;
    image_gen::register(
        registry,
        image_gen::ImageGenTool::new(
            config.replicate_api_base.clone(),
            replicate,
            ctx.credentials.clone(),
        ),
    )?;
    image_display::register(registry, image_display::ImageDisplayTool::new(viewer))?;
    add::register(registry)?;

    tracing::info!("Registered {} tools", registry.len());
    Ok(())
}
