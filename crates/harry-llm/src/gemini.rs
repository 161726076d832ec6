use std::time::Duration;

use async_trait::async_trait;
use harry_core::{Content, ContentPart, CompletionRequest, CompletionResponse, Role};
use reqwest::{header, Client};
use serde_json::{json, Value};

use crate::client::CompletionClient;
use crate::error::{LLMError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client.
///
/// Handles request shaping and response flattening; all contract-level
/// validation (structured output, sentiment enum) stays with the caller.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Preferred model when no override is configured
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Create a new client with a 30s per-call timeout
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LLMError::Config(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (test servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model identifier this client calls
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Shape a completion request into the generateContent wire body.
    ///
    /// System messages go into `systemInstruction`; the rest become
    /// `contents` entries (assistant turns use the `model` role).
    fn build_body(request: &CompletionRequest) -> Value {
        let mut system_parts: Vec<Value> = Vec::new();
        let mut contents: Vec<Value> = Vec::new();

        for message in &request.messages {
            let text = message.text().unwrap_or_default();
            match message.role {
                Role::System => system_parts.push(json!({ "text": text })),
                Role::User => contents.push(json!({
                    "role": "user",
                    "parts": [{ "text": text }],
                })),
                Role::Assistant => contents.push(json!({
                    "role": "model",
                    "parts": [{ "text": text }],
                })),
            }
        }

        let mut body = json!({ "contents": contents });

        if !system_parts.is_empty() {
            body["systemInstruction"] = json!({ "parts": system_parts });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temperature) = request.options.temperature {
            generation_config.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max) = request.options.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max));
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }

    /// Flatten the candidate payload into response content.
    fn parse_body(body: &Value) -> Result<CompletionResponse> {
        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .ok_or_else(|| LLMError::Payload("missing candidates content".to_string()))?;

        let parts: Vec<ContentPart> = parts
            .iter()
            .filter_map(|part| part.get("text"))
            .filter_map(Value::as_str)
            .map(ContentPart::text)
            .collect();

        Ok(CompletionResponse::new(Content::parts(parts)))
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = Self::build_body(&request);

        tracing::debug!(model = %self.model, "calling Gemini generateContent");

        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LLMError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| LLMError::Network(e.to_string()))?;

        Self::parse_body(&payload)
    }
}
