//! Turn state machine: sanitize → prompt → complete → parse → rebuild memory.

use std::sync::Arc;

use harry_core::{CompletionRequest, Message, Sentiment};
use harry_llm::{CompletionClient, LLMError};
use harry_memory::SummaryMemoryStore;
use serde::Serialize;

use crate::error::{ChatError, ChatResult};
use crate::parser::parse_structured_reply;
use crate::prompts::{build_format_instructions, build_system_prompt, build_user_prompt};
use crate::safety::sanitize_user_message;

const CHAT_TEMPERATURE: f32 = 0.4;
const CHAT_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Successful outcome of a single chat turn.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatTurnResult {
    pub reply: String,
    pub sentiment: Sentiment,
}

/// Drives one conversation turn end to end.
///
/// Owns no session state itself; persistence is delegated entirely to the
/// summary memory store. Each external call is attempted exactly once.
pub struct ChatOrchestrator {
    client: Arc<dyn CompletionClient>,
    memory: Arc<SummaryMemoryStore>,
}

impl ChatOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, memory: Arc<SummaryMemoryStore>) -> Self {
        Self { client, memory }
    }

    /// Shared summary memory handle.
    pub fn memory(&self) -> &Arc<SummaryMemoryStore> {
        &self.memory
    }

    /// Execute a full turn for `session_id`.
    ///
    /// `summary_override`, when provided, replaces the stored summary as
    /// context for this turn only (tests and advanced callers).
    pub async fn execute_turn(
        &self,
        session_id: &str,
        raw_message: &str,
        summary_override: Option<&str>,
    ) -> ChatResult<ChatTurnResult> {
        if session_id.trim().is_empty() {
            return Err(ChatError::Configuration(
                "A session id is required.".to_string(),
            ));
        }

        let sanitized = sanitize_user_message(raw_message)?;

        let summary = match summary_override {
            Some(summary) => Some(summary.to_string()),
            None => self.memory.get(session_id),
        };

        let request = CompletionRequest::new()
            .with_message(Message::system(build_system_prompt()))
            .with_message(Message::user(build_user_prompt(
                &sanitized,
                summary.as_deref(),
                &build_format_instructions(),
            )))
            .temperature(CHAT_TEMPERATURE)
            .max_output_tokens(CHAT_MAX_OUTPUT_TOKENS)
            .with_metadata("project", "harry-potter-3d-chatbot")
            .with_metadata("source", "execute_chat");

        let response = self
            .client
            .complete(request)
            .await
            .map_err(classify_completion_error)?;

        let raw = response.text();
        if raw.is_empty() {
            return Err(ChatError::Provider(
                "Gemini returned an empty response.".to_string(),
            ));
        }

        let parsed = parse_structured_reply(&raw)?;

        // Rebuild failure fails the whole turn; the reply is not returned.
        self.memory
            .rebuild(
                self.client.as_ref(),
                session_id,
                &sanitized,
                &parsed.text,
                summary_override,
            )
            .await?;

        tracing::debug!(session_id, sentiment = %parsed.sentiment, "chat turn completed");

        Ok(ChatTurnResult {
            reply: parsed.text,
            sentiment: parsed.sentiment,
        })
    }
}

/// Sort a completion failure into the turn taxonomy: provider rejections and
/// malformed payloads are contract violations; transport-level failures stay
/// unclassified and surface as the generic error downstream.
fn classify_completion_error(error: LLMError) -> ChatError {
    match error {
        LLMError::Api { .. } | LLMError::Payload(_) => ChatError::Provider(error.to_string()),
        LLMError::Config(message) => ChatError::Configuration(message),
        LLMError::Network(message) => ChatError::Internal(message),
    }
}
