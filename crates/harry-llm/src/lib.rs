mod client;
mod error;
mod gemini;

pub use client::CompletionClient;
pub use error::{LLMError, Result};
pub use gemini::GeminiClient;
