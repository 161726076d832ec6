mod chat;
mod health;

pub use chat::{chat_handler, ChatResponsePayload, ErrorResponse, GENERIC_ERROR_MESSAGE};
pub use health::health_handler;
