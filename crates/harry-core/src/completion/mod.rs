mod request;
mod response;

pub use request::{CompletionOptions, CompletionRequest};
pub use response::CompletionResponse;
