mod error;
mod orchestrator;
mod parser;
pub mod prompts;
pub mod safety;

pub use error::{ChatError, ChatResult};
pub use orchestrator::{ChatOrchestrator, ChatTurnResult};
pub use parser::parse_structured_reply;
