//! `POST /api/chat` - the turn pipeline boundary.
//!
//! PARSE_BODY → VALIDATE → RESOLVE_SESSION → RUN_TURN → SYNTHESIZE → RESPOND.
//! Every domain error kind maps to exactly one status; anything unclassified
//! becomes a generic 502 with the original logged server-side.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use harry_chat::ChatError;
use harry_core::Sentiment;
use harry_voice::{SynthesizedAudio, VoiceError};
use serde::Serialize;
use serde_json::Value;

use crate::session::{build_set_cookie_header, generate_session_id, resolve_session_id};
use crate::state::AppState;

pub const GENERIC_ERROR_MESSAGE: &str = "Unable to chat with Harry right now. Please retry.";

/// 成功响应体
#[derive(Debug, Serialize)]
pub struct ChatResponsePayload {
    pub reply: String,
    pub sentiment: Sentiment,
    pub audio: SynthesizedAudio,
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// 聊天处理器
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // PARSE_BODY
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Request body must be valid JSON.");
    };

    // VALIDATE
    let Some(message) = payload.get("message").and_then(Value::as_str) else {
        return error_response(StatusCode::BAD_REQUEST, "Message is required.");
    };

    // RESOLVE_SESSION
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    let resolved = resolve_session_id(cookie_header, generate_session_id);

    tracing::debug!(
        session_id = %resolved.session_id,
        fresh_session = resolved.should_set_cookie,
        "processing chat request"
    );

    // RUN_TURN
    let orchestrator = match state.chat() {
        Ok(orchestrator) => orchestrator,
        Err(error) => return chat_error_response(error),
    };
    let result = match orchestrator
        .execute_turn(&resolved.session_id, message, None)
        .await
    {
        Ok(result) => result,
        Err(error) => return chat_error_response(error),
    };

    // SYNTHESIZE - only runs when the chat turn succeeded
    let voice = match state.voice() {
        Ok(voice) => voice,
        Err(error) => return voice_error_response(error),
    };
    let audio = match voice.synthesize(&result.reply).await {
        Ok(audio) => audio,
        Err(error) => return voice_error_response(error),
    };

    // RESPOND
    let mut response = (
        StatusCode::OK,
        Json(ChatResponsePayload {
            reply: result.reply,
            sentiment: result.sentiment,
            audio,
        }),
    )
        .into_response();

    if resolved.should_set_cookie {
        let cookie = build_set_cookie_header(&resolved.session_id, state.secure_cookies());
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }

    response
}

/// 按 ChatError 分类映射状态码
fn chat_error_response(error: ChatError) -> Response {
    match error {
        ChatError::Input(message) => error_response(StatusCode::BAD_REQUEST, message),
        ChatError::Configuration(message) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
        ChatError::Provider(message) | ChatError::Memory(message) => {
            error_response(StatusCode::BAD_GATEWAY, message)
        }
        ChatError::Internal(message) => {
            tracing::error!(error = %message, "chat route failed");
            error_response(StatusCode::BAD_GATEWAY, GENERIC_ERROR_MESSAGE)
        }
    }
}

/// 按 VoiceError 分类映射状态码
fn voice_error_response(error: VoiceError) -> Response {
    match error {
        VoiceError::Configuration(message) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
        VoiceError::Synthesis(message) => error_response(StatusCode::BAD_GATEWAY, message),
    }
}
