/// Weather Forecast Tool
///
/// `get-forecast` resolves a coordinate pair to its NWS grid point, then
/// follows the grid point's forecast link. Only US locations are covered
/// by the provider.

use futures_util::FutureExt;
use std::sync::Arc;

use crate::core::error::{RegistryError, ToolError};
use crate::core::http::HttpFetcher;
use crate::core::registry::{MCPTool, ToolHandler, ToolRegistry};
use crate::core::schema::{InputSchema, ParamDef, ToolArgs};
use crate::tools::weather::{ForecastResponse, PointsResponse, format_period, format_report};

pub const NAME: &str = "get-forecast";

pub struct ForecastTool {
    api_base: String,
    fetcher: HttpFetcher,
}

impl ForecastTool {
    pub fn new(api_base: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            api_base: api_base.into(),
            fetcher,
        }
    }

    pub async fn run(&self, latitude: f64, longitude: f64) -> Result<String, ToolError> {
        let points_url = format!("{}/points/{:.4},{:.4}", self.api_base, latitude, longitude);

        let points: PointsResponse = self.fetcher.get_json(&points_url).await.map_err(|e| {
            tracing::warn!(latitude, longitude, error = %e, "grid point lookup failed");
            ToolError::Upstream(format!(
                "Failed to retrieve grid point data for coordinates: {}, {}. \
                 This location may not be supported by the NWS API (only US locations are supported).",
                latitude, longitude
            ))
        })?;

        let forecast_url = points
            .properties
            .and_then(|p| p.forecast)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                ToolError::Upstream("Failed to get forecast URL from grid point data".to_string())
            })?;

        let forecast: ForecastResponse = self.fetcher.get_json(&forecast_url).await.map_err(|e| {
            tracing::warn!(%forecast_url, error = %e, "forecast request failed");
            ToolError::Upstream("Failed to retrieve forecast data".to_string())
        })?;

        let periods = forecast.properties.map(|p| p.periods).unwrap_or_default();
        if periods.is_empty() {
            return Ok("No forecast periods available".to_string());
        }

        Ok(format_report(
            &format!("Forecast for {}, {}", latitude, longitude),
            &periods,
            format_period,
        ))
    }
}

pub fn register(registry: &mut ToolRegistry, tool: ForecastTool) -> Result<(), RegistryError> {
    let definition = MCPTool {
        name: NAME.to_string(),
        description: "Get weather forecast for a location".to_string(),
        input_schema: InputSchema::new()
            .param(ParamDef::number("latitude", "Latitude of the location").range(-90.0, 90.0))
            .param(ParamDef::number("longitude", "Longitude of the location").range(-180.0, 180.0)),
    };

    let tool = Arc::new(tool);
    let handler: ToolHandler = Box::new(move |args: ToolArgs| {
        let tool = tool.clone();
        async move {
            let (Some(latitude), Some(longitude)) = (args.f64("latitude"), args.f64("longitude"))
            else {
                return Err(ToolError::InvalidArguments(
                    "latitude and longitude are required".to_string(),
                ));
            };
            tool.run(latitude, longitude).await
        }
        .boxed()
    });

    registry.register(definition, handler)
}
