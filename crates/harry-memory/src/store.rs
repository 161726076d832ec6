//! # Summary Memory Store
//!
//! 会话 id → 滚动摘要 的并发映射。条目在首次触达时创建，
//! `expires_at` 固定为创建时间 + TTL，读写都不会刷新它。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use harry_core::{CompletionRequest, Message};
use harry_llm::CompletionClient;

use crate::clock::Clock;
use crate::error::{MemoryError, MemoryResult};
use crate::prompts::{build_summary_system_prompt, build_summary_user_prompt};

/// 条目固定存活时长（秒）
pub const SESSION_MEMORY_TTL_SECONDS: i64 = 60 * 60;

const SUMMARY_TEMPERATURE: f32 = 0.2;
const SUMMARY_MAX_OUTPUT_TOKENS: u32 = 512;

/// 单个会话的摘要条目
#[derive(Debug, Clone)]
pub struct SessionMemoryEntry {
    pub summary: Option<String>,
    pub expires_at: DateTime<Utc>,
}

/// 会话摘要存储
///
/// 所有 `SessionMemoryEntry` 由本存储独占持有；编排器只通过
/// `get` / `rebuild` / `reset` 访问。映射操作本身短暂加锁，
/// LLM 调用期间不持有任何条目锁。
pub struct SummaryMemoryStore {
    entries: DashMap<String, SessionMemoryEntry>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SummaryMemoryStore {
    /// 使用注入的时钟与默认 1 小时 TTL 创建存储
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            ttl: Duration::seconds(SESSION_MEMORY_TTL_SECONDS),
        }
    }

    /// 覆盖 TTL（测试用）
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// 清理所有已过期条目（expires_at <= now）
    fn prune_expired(&self, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// 返回会话当前的摘要；不存在或已过期时返回 None
    pub fn get(&self, session_id: &str) -> Option<String> {
        let now = self.clock.now();
        self.prune_expired(now);
        self.entries
            .get(session_id)
            .and_then(|entry| entry.summary.clone())
    }

    /// 调用模型重写会话摘要并存储结果
    ///
    /// `previous_override` 提供时代替已存储的摘要参与本次重写，
    /// 但不会写回覆盖值本身。写回保留条目原有的 `expires_at`。
    pub async fn rebuild(
        &self,
        client: &dyn CompletionClient,
        session_id: &str,
        user_message: &str,
        assistant_reply: &str,
        previous_override: Option<&str>,
    ) -> MemoryResult<String> {
        let now = self.clock.now();
        self.prune_expired(now);

        // 先解析条目并复制所需字段，避免跨 await 持有映射锁
        let (previous_summary, expires_at) = {
            let entry = self
                .entries
                .entry(session_id.to_string())
                .or_insert_with(|| SessionMemoryEntry {
                    summary: None,
                    expires_at: now + self.ttl,
                });
            let previous = previous_override
                .map(str::to_string)
                .or_else(|| entry.summary.clone());
            (previous, entry.expires_at)
        };

        let request = CompletionRequest::new()
            .with_message(Message::system(build_summary_system_prompt()))
            .with_message(Message::user(build_summary_user_prompt(
                previous_summary.as_deref(),
                user_message,
                assistant_reply,
            )))
            .temperature(SUMMARY_TEMPERATURE)
            .max_output_tokens(SUMMARY_MAX_OUTPUT_TOKENS)
            .with_metadata("project", "harry-potter-3d-chatbot")
            .with_metadata("source", "summary_memory");

        let response = client
            .complete(request)
            .await
            .map_err(|e| MemoryError::Completion(e.to_string()))?;

        let refreshed = response.text();
        if refreshed.is_empty() {
            return Err(MemoryError::EmptySummary);
        }

        tracing::debug!(session_id, "summary memory rebuilt");

        // 最后写入者胜出；同一会话的并发重建不做额外协调
        self.entries.insert(
            session_id.to_string(),
            SessionMemoryEntry {
                summary: Some(refreshed.clone()),
                expires_at,
            },
        );

        Ok(refreshed)
    }

    /// 清除单个会话，或在不传 id 时清空全部条目（测试/调试用）
    pub fn reset(&self, session_id: Option<&str>) {
        match session_id {
            Some(id) => {
                self.entries.remove(id);
            }
            None => self.entries.clear(),
        }
    }
}
