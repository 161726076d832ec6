use std::collections::HashMap;

use serde_json::Value;

use crate::types::Message;

/// Completion request sent to the model
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
    /// Tracing tags attached to the call (project, source, ...)
    pub metadata: HashMap<String, Value>,
}

impl CompletionRequest {
    /// Create a new completion request
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            options: CompletionOptions::default(),
            metadata: HashMap::new(),
        }
    }

    /// Add a message to the request
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Add multiple messages
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Attach a metadata tag
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f32) -> Self {
        self.options.temperature = Some(temp);
        self
    }

    /// Set max output tokens
    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.options.max_output_tokens = Some(max);
        self
    }
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for a completion call
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new()
            .with_message(Message::system("persona"))
            .with_message(Message::user("Hello"))
            .temperature(0.4)
            .max_output_tokens(2048)
            .with_metadata("source", "execute_chat");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.options.temperature, Some(0.4));
        assert_eq!(request.options.max_output_tokens, Some(2048));
        assert_eq!(
            request.metadata.get("source").and_then(|v| v.as_str()),
            Some("execute_chat")
        );
    }
}
