mod client;
mod elevenlabs;
mod error;
mod types;

pub use client::SpeechClient;
pub use elevenlabs::ElevenLabsClient;
pub use error::{VoiceError, VoiceResult};
pub use types::SynthesizedAudio;
