use async_trait::async_trait;
use harry_core::{CompletionRequest, CompletionResponse};

use crate::error::Result;

/// Opaque completion capability.
///
/// The orchestrator and the summary memory only depend on this trait, so
/// tests swap the network client for an in-process mock.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a single completion call. Exactly one attempt; no internal retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
