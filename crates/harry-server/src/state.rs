use std::sync::Arc;

use harry_chat::{ChatError, ChatOrchestrator};
use harry_llm::GeminiClient;
use harry_memory::{SummaryMemoryStore, SystemClock};
use harry_voice::{ElevenLabsClient, SpeechClient, VoiceError};

use crate::config::ServerConfig;

/// 应用状态 - 在 main.rs 中创建并共享给所有 handler
///
/// chat / voice 两侧都保存「可用的客户端或启动时发现的配置错误」：
/// 缺失的凭证必须在每个请求上以 500 + 原始信息回放，而不是启动失败。
#[derive(Clone)]
pub struct AppState {
    chat: Result<Arc<ChatOrchestrator>, ChatError>,
    voice: Result<Arc<dyn SpeechClient>, VoiceError>,
    memory: Arc<SummaryMemoryStore>,
    secure_cookies: bool,
}

impl AppState {
    /// 依据配置与环境变量构建生产状态
    pub fn from_config(config: &ServerConfig) -> Self {
        let memory = Arc::new(SummaryMemoryStore::new(Arc::new(SystemClock)));

        let chat = match &config.gemini_api_key {
            Some(api_key) => GeminiClient::new(api_key, &config.gemini_model)
                .map(|client| {
                    Arc::new(ChatOrchestrator::new(
                        Arc::new(client),
                        Arc::clone(&memory),
                    ))
                })
                .map_err(|e| ChatError::Configuration(e.to_string())),
            None => Err(ChatError::Configuration(
                "GEMINI_API_KEY must be configured.".to_string(),
            )),
        };

        let voice = ElevenLabsClient::from_env()
            .map(|client| Arc::new(client) as Arc<dyn SpeechClient>);

        Self {
            chat,
            voice,
            memory,
            secure_cookies: config.production,
        }
    }

    /// 注入客户端构建状态（测试用）
    pub fn with_clients(
        chat: Result<Arc<ChatOrchestrator>, ChatError>,
        voice: Result<Arc<dyn SpeechClient>, VoiceError>,
        memory: Arc<SummaryMemoryStore>,
    ) -> Self {
        Self {
            chat,
            voice,
            memory,
            secure_cookies: false,
        }
    }

    /// 聊天编排器；未配置时返回待回放的配置错误
    pub fn chat(&self) -> Result<&Arc<ChatOrchestrator>, ChatError> {
        self.chat.as_ref().map_err(Clone::clone)
    }

    /// 语音客户端；未配置时返回待回放的配置错误
    pub fn voice(&self) -> Result<&Arc<dyn SpeechClient>, VoiceError> {
        self.voice.as_ref().map_err(Clone::clone)
    }

    /// 共享摘要存储
    pub fn memory(&self) -> &Arc<SummaryMemoryStore> {
        &self.memory
    }

    /// 会话 cookie 是否带 Secure
    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }
}
