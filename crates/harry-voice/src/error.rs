use thiserror::Error;

/// Error taxonomy for speech synthesis
#[derive(Debug, Clone, Error)]
pub enum VoiceError {
    /// Missing or invalid provider credentials (500)
    #[error("{0}")]
    Configuration(String),

    /// The provider rejected or failed the synthesis call (502)
    #[error("{0}")]
    Synthesis(String),
}

pub type VoiceResult<T> = Result<T, VoiceError>;
