use async_trait::async_trait;

use crate::error::VoiceResult;
use crate::types::SynthesizedAudio;

/// Opaque text-to-speech capability, mockable in tests.
#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Convert reply text into encoded audio. One attempt per call.
    async fn synthesize(&self, text: &str) -> VoiceResult<SynthesizedAudio>;
}
