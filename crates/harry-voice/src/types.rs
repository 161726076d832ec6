use serde::{Deserialize, Serialize};

/// Encoded audio produced for one reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynthesizedAudio {
    pub base64: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}
