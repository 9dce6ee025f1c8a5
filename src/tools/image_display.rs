/// Image Display Tool
///
/// `display-image` hands a URL to the desktop's default viewer. The actual
/// launch sits behind `ImageViewer` so it can be swapped out.

use async_trait::async_trait;
use futures_util::FutureExt;
use std::sync::Arc;

use crate::core::error::{RegistryError, ToolError};
use crate::core::registry::{MCPTool, ToolHandler, ToolRegistry};
use crate::core::schema::{InputSchema, ParamDef, ToolArgs};

pub const NAME: &str = "display-image";

#[async_trait]
pub trait ImageViewer: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), ToolError>;
}

/// Hands the URL to the desktop's registered handler.
pub struct SystemViewer;

#[async_trait]
impl ImageViewer for SystemViewer {
    async fn open(&self, url: &str) -> Result<(), ToolError> {
        let target = url.to_string();
        tokio::task::spawn_blocking(move || open::that(target))
            .await
            .map_err(|e| ToolError::Execution(format!("image viewer task failed: {}", e)))?
            .map_err(|e| ToolError::Execution(format!("could not launch image viewer: {}", e)))
    }
}

/// Only web URLs are handed to the viewer.
fn web_url(url: &str) -> Result<reqwest::Url, ToolError> {
    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(ToolError::InvalidArguments(format!(
            "url must be an http or https URL, got '{}'",
            url
        ))),
    }
}

pub struct ImageDisplayTool {
    viewer: Arc<dyn ImageViewer>,
}

impl ImageDisplayTool {
    pub fn new(viewer: Arc<dyn ImageViewer>) -> Self {
        Self { viewer }
    }

    pub async fn run(&self, url: &str) -> Result<String, ToolError> {
        let parsed = web_url(url)?;
        tracing::info!(url, "opening image");
        self.viewer.open(parsed.as_str()).await?;
        Ok(format!("Opened image in the default viewer: {}", url))
    }
}

pub fn register(registry: &mut ToolRegistry, tool: ImageDisplayTool) -> Result<(), RegistryError> {
    let definition = MCPTool {
        name: NAME.to_string(),
        description: "Open an image URL in the system's default image viewer".to_string(),
        input_schema: InputSchema::new()
            .param(ParamDef::string("url", "URL of the image to display").length(1, None)),
    };

    let tool = Arc::new(tool);
    let handler: ToolHandler = Box::new(move |args: ToolArgs| {
        let tool = tool.clone();
        async move {
            let url = args
                .str("url")
                .ok_or_else(|| ToolError::InvalidArguments("url is required".to_string()))?;
            tool.run(url).await
        }
        .boxed()
    });

    registry.register(definition, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::Dispatcher;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingViewer {
        opened: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl ImageViewer for RecordingViewer {
        async fn open(&self, url: &str) -> Result<(), ToolError> {
            if self.fail {
                return Err(ToolError::Execution("no display".to_string()));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn opens_url_and_confirms() {
        let viewer = Arc::new(RecordingViewer::default());
        let tool = ImageDisplayTool::new(viewer.clone());

        let text = tool.run("https://cdn.example/cat.png").await.unwrap();
        assert_eq!(text, "Opened image in the default viewer: https://cdn.example/cat.png");
        assert_eq!(*viewer.opened.lock().unwrap(), vec!["https://cdn.example/cat.png"]);
    }

    #[tokio::test]
    async fn viewer_failure_is_reported() {
        let tool = ImageDisplayTool::new(Arc::new(RecordingViewer {
            fail: true,
            ..Default::default()
        }));

        let err = tool.run("https://cdn.example/cat.png").await.unwrap_err();
        assert_eq!(err.to_string(), "Execution failed: no display");
    }

    #[tokio::test]
    async fn non_web_targets_never_reach_the_viewer() {
        let viewer = Arc::new(RecordingViewer::default());
        let tool = ImageDisplayTool::new(viewer.clone());

        for target in ["--help", "/etc/passwd", "file:///etc/passwd", "javascript:alert(1)"] {
            let err = tool.run(target).await.unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments(_)), "{target}");
            assert!(err.to_string().contains("http or https"));
        }
        assert!(viewer.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_string_is_passed_through() {
        let viewer = Arc::new(RecordingViewer::default());
        let tool = ImageDisplayTool::new(viewer.clone());

        tool.run("http://cdn.example/render?a=1&b=2").await.unwrap();
        assert_eq!(
            *viewer.opened.lock().unwrap(),
            vec!["http://cdn.example/render?a=1&b=2"]
        );
    }

    #[tokio::test]
    async fn dispatcher_reports_rejected_url() {
        let viewer = Arc::new(RecordingViewer::default());
        let mut registry = ToolRegistry::new();
        register(&mut registry, ImageDisplayTool::new(viewer.clone())).unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry));

        let result = dispatcher
            .invoke(NAME, json!({ "url": "file:///etc/passwd" }))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.text_content(),
            "Invalid arguments: url must be an http or https URL, got 'file:///etc/passwd'"
        );
        assert!(viewer.opened.lock().unwrap().is_empty());
    }
}
