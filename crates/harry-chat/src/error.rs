use thiserror::Error;

/// Failure taxonomy for a chat turn.
///
/// One tagged union instead of an exception hierarchy, so the HTTP boundary
/// maps errors to statuses with a single exhaustive match. `Internal` carries
/// anything unclassified (e.g. transport failures); the boundary surfaces a
/// fixed generic message for it and logs the original.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// Missing credentials or session identity (fatal setup, 500)
    #[error("{0}")]
    Configuration(String),

    /// Caller-correctable input problem (400)
    #[error("{0}")]
    Input(String),

    /// The provider did not honor the completion contract (502)
    #[error("{0}")]
    Provider(String),

    /// Summary memory rebuild failed (502)
    #[error("{0}")]
    Memory(String),

    /// Unclassified failure (502, generic message)
    #[error("{0}")]
    Internal(String),
}

impl From<harry_memory::MemoryError> for ChatError {
    fn from(e: harry_memory::MemoryError) -> Self {
        ChatError::Memory(e.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
