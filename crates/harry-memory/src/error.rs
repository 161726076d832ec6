use thiserror::Error;

/// 摘要重建失败时的错误类型
#[derive(Debug, Error)]
pub enum MemoryError {
    /// 模型返回了空摘要
    #[error("Gemini returned an empty summary.")]
    EmptySummary,

    /// 摘要重建的 LLM 调用失败
    #[error("summary completion failed: {0}")]
    Completion(String),
}

pub type MemoryResult<T> = Result<T, MemoryError>;
