mod content;
mod message;
mod sentiment;

pub use content::{Content, ContentPart};
pub use message::{Message, Role};
pub use sentiment::Sentiment;
