/// Image Generation Tool
///
/// `generate-image` runs a Stable Diffusion XL prediction on Replicate and
/// returns the URL of the first generated image. The request asks the
/// provider to hold the connection until the prediction completes.

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::config::{CredentialSource, REPLICATE_TOKEN_VAR};
use crate::core::error::{FetchError, RegistryError, ToolError};
use crate::core::http::HttpFetcher;
use crate::core::registry::{MCPTool, ToolHandler, ToolRegistry};
use crate::core::schema::{InputSchema, ParamDef, ToolArgs};

pub const NAME: &str = "generate-image";

pub const SDXL_VERSION: &str = "39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

/// Prediction request body.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub version: String,
    pub input: SdxlInput,
}

/// Model input. Everything except the prompt is a fixed default.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SdxlInput {
    pub width: u32,
    pub height: u32,
    pub prompt: String,
    pub refine: String,
    pub scheduler: String,
    pub lora_scale: f64,
    pub num_outputs: u32,
    pub guidance_scale: f64,
    pub apply_watermark: bool,
    pub high_noise_frac: f64,
    pub negative_prompt: String,
    pub prompt_strength: f64,
    pub num_inference_steps: u32,
}

impl SdxlInput {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            width: 1024,
            height: 1024,
            prompt: prompt.into(),
            refine: "expert_ensemble_refiner".to_string(),
            scheduler: "K_EULER".to_string(),
            lora_scale: 0.6,
            num_outputs: 1,
            guidance_scale: 7.5,
            apply_watermark: false,
            high_noise_frac: 0.8,
            negative_prompt: String::new(),
            prompt_strength: 0.8,
            num_inference_steps: 25,
        }
    }
}

/// Prediction reply; only the fields we read.
#[derive(Deserialize, Debug, Default)]
pub struct Prediction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct ImageGenTool {
    api_base: String,
    fetcher: HttpFetcher,
    credentials: Arc<dyn CredentialSource>,
}

impl ImageGenTool {
    pub fn new(
        api_base: impl Into<String>,
        fetcher: HttpFetcher,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            fetcher,
            credentials,
        }
    }

    pub async fn run(&self, prompt: &str) -> Result<String, ToolError> {
        let token = self
            .credentials
            .get(REPLICATE_TOKEN_VAR)
            .ok_or_else(|| ToolError::MissingCredential(REPLICATE_TOKEN_VAR.to_string()))?;

        let body = PredictionRequest {
            version: SDXL_VERSION.to_string(),
            input: SdxlInput::with_prompt(prompt),
        };
        let url = format!("{}/v1/predictions", self.api_base);

        let prediction: Prediction = self
            .fetcher
            .post_json(&url, &token, &[("Prefer", "wait")], &body)
            .await
            .and_then(check_prediction)
            .map_err(|e| {
                tracing::warn!(error = %e, "image generation failed");
                ToolError::Upstream(format!("Failed to generate image: {}", e))
            })?;

        tracing::debug!(id = ?prediction.id, "prediction completed");
        prediction
            .output
            .and_then(|urls| urls.into_iter().next())
            .ok_or_else(|| {
                ToolError::Upstream("Failed to generate image: no output returned".to_string())
            })
    }
}

/// Treat a provider-reported error inside a 2xx reply as a failure.
fn check_prediction(prediction: Prediction) -> Result<Prediction, FetchError> {
    match prediction.error.as_deref() {
        Some(message) if !message.is_empty() => Err(FetchError::Provider(message.to_string())),
        _ => Ok(prediction),
    }
}

pub fn register(registry: &mut ToolRegistry, tool: ImageGenTool) -> Result<(), RegistryError> {
    let definition = MCPTool {
        name: NAME.to_string(),
        description: "Generate an image from a text prompt with Stable Diffusion XL and return its URL"
            .to_string(),
        input_schema: InputSchema::new().param(
            ParamDef::string("prompt", "Text description of the image to generate").length(1, None),
        ),
    };

    let tool = Arc::new(tool);
    let handler: ToolHandler = Box::new(move |args: ToolArgs| {
        let tool = tool.clone();
        async move {
            let prompt = args
                .str("prompt")
                .ok_or_else(|| ToolError::InvalidArguments("prompt is required".to_string()))?;
            tool.run(prompt).await
        }
        .boxed()
    });

    registry.register(definition, handler)
}
