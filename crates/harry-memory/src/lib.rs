//! # Summary Memory
//!
//! 基于会话的滚动摘要缓存：每个会话保存一条由模型重写的对话摘要，
//! 条目从创建起固定 1 小时后过期（惰性清理，无后台定时器）。

mod clock;
mod error;
mod prompts;
mod store;

pub use clock::{Clock, SystemClock};
pub use error::{MemoryError, MemoryResult};
pub use prompts::{build_summary_system_prompt, build_summary_user_prompt};
pub use store::{SessionMemoryEntry, SummaryMemoryStore};
