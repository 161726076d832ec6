use harry_llm::GeminiClient;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// Gemini API key（缺失时每个请求返回配置错误）
    pub gemini_api_key: Option<String>,
    /// Gemini 模型名称
    pub gemini_model: String,
    /// 生产模式（会话 cookie 带 Secure）
    pub production: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            gemini_api_key: None,
            gemini_model: GeminiClient::DEFAULT_MODEL.to_string(),
            production: false,
        }
    }
}

impl ServerConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HARRY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("HARRY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .ok()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GeminiClient::DEFAULT_MODEL.to_string()),
            production: std::env::var("HARRY_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.gemini_model, GeminiClient::DEFAULT_MODEL);
        assert!(!config.production);
    }
}
