/// Result Envelope
///
/// The uniform payload returned for every `tools/call`. It serializes to the
/// MCP `CallToolResult` shape: `{"content": [...], "isError": bool}`.

use serde::Serialize;

/// One block of tool output.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text block.
    Text { text: String },
    /// Base64 encoded image block. Part of the protocol, no tool here emits it.
    #[allow(dead_code)]
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

/// Envelope wrapping the content blocks of one invocation.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl CallToolResult {
    /// Successful invocation carrying a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Failed invocation carrying a single text block describing why.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Concatenated text of all text blocks.
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                Content::Text { text } => Some(text.as_str()),
                Content::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
