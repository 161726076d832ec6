pub mod completion;
pub mod types;

pub use completion::{CompletionOptions, CompletionRequest, CompletionResponse};
pub use types::{Content, ContentPart, Message, Role, Sentiment};
