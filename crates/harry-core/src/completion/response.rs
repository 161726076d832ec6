use crate::types::Content;

/// Completion response returned by the model
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: Content,
}

impl CompletionResponse {
    /// Create a new response
    pub fn new(content: Content) -> Self {
        Self { content }
    }

    /// Create a plain text response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Content::text(text),
        }
    }

    /// Extract plain text: first non-empty chunk, trimmed.
    /// Empty string when the model produced nothing usable.
    pub fn text(&self) -> String {
        self.content.first_text()
    }
}
