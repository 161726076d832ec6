use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{header, Client};
use serde_json::{json, Value};

use crate::client::SpeechClient;
use crate::error::{VoiceError, VoiceResult};
use crate::types::SynthesizedAudio;

const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";
const DEFAULT_MIME_TYPE: &str = "audio/mpeg";

/// ElevenLabs streaming-synthesis client.
pub struct ElevenLabsClient {
    http: Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsClient {
    /// Build from environment variables.
    ///
    /// `ELEVENLABS_API_KEY` and `ELEVENLABS_VOICE_ID` are required;
    /// `ELEVENLABS_MODEL_ID` falls back to the default model.
    pub fn from_env() -> VoiceResult<Self> {
        let api_key = require_env(
            "ELEVENLABS_API_KEY",
            "ELEVENLABS_API_KEY must be configured.",
        )?;
        let voice_id = require_env(
            "ELEVENLABS_VOICE_ID",
            "ELEVENLABS_VOICE_ID must be configured.",
        )?;
        let model_id = std::env::var("ELEVENLABS_MODEL_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        Self::new(api_key, voice_id, model_id)
    }

    /// Create a client with explicit credentials and a 30s per-call timeout
    pub fn new(
        api_key: impl Into<String>,
        voice_id: impl Into<String>,
        model_id: impl Into<String>,
    ) -> VoiceResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VoiceError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            voice_id: voice_id.into(),
            model_id: model_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (test servers, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a descriptive synthesis error from a failed response body.
    ///
    /// Checks the JSON `detail`, `message`, and `error` fields in order, then
    /// falls back to the raw body text, then to the bare status message.
    fn build_synthesis_error(status: u16, body: &[u8]) -> VoiceError {
        let base_message = format!("ElevenLabs synthesis failed ({status})");

        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            let detail = ["detail", "message", "error"].iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            });
            if let Some(detail) = detail {
                return VoiceError::Synthesis(format!("{base_message}: {detail}"));
            }
        }

        let fallback = String::from_utf8_lossy(body);
        let fallback = fallback.trim();
        if !fallback.is_empty() {
            return VoiceError::Synthesis(format!("{base_message}: {fallback}"));
        }

        VoiceError::Synthesis(base_message)
    }
}

/// Read a required env var, trimming whitespace.
fn require_env(name: &str, message: &str) -> VoiceResult<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| VoiceError::Configuration(message.to_string()))
}

#[async_trait]
impl SpeechClient for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> VoiceResult<SynthesizedAudio> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VoiceError::Synthesis(
                "Cannot synthesize an empty response.".to_string(),
            ));
        }

        let url = format!(
            "{}/v1/text-to-speech/{}/stream",
            self.base_url, self.voice_id
        );

        tracing::debug!(voice_id = %self.voice_id, "calling ElevenLabs synthesis");

        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, DEFAULT_MIME_TYPE)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": trimmed,
                "model_id": self.model_id,
                "voice_settings": {
                    "stability": 0.3,
                    "similarity_boost": 0.85,
                },
            }))
            .send()
            .await
            .map_err(|e| VoiceError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(Self::build_synthesis_error(status.as_u16(), &body));
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VoiceError::Synthesis(e.to_string()))?;

        Ok(SynthesizedAudio {
            base64: BASE64.encode(&bytes),
            mime_type,
        })
    }
}
