use serde::{Deserialize, Serialize};

/// Content type for messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Simple text content
    Text { text: String },
    /// Multi-part content (Gemini answers in part lists)
    Parts { parts: Vec<ContentPart> },
}

/// Individual content part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content
    Text { text: String },
}

impl Content {
    /// Create text content
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create content from parts
    pub fn parts(parts: Vec<ContentPart>) -> Self {
        Self::Parts { parts }
    }

    /// Check if content is empty
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text { text } => text.is_empty(),
            Self::Parts { parts } => parts.is_empty(),
        }
    }

    /// Extract plain text: the first part whose trimmed text is non-empty,
    /// scanning in order. Returns an empty string when nothing qualifies.
    pub fn first_text(&self) -> String {
        match self {
            Self::Text { text } => text.trim().to_string(),
            Self::Parts { parts } => parts
                .iter()
                .find_map(|part| {
                    let ContentPart::Text { text } = part;
                    let trimmed = text.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .unwrap_or_default(),
        }
    }
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}
