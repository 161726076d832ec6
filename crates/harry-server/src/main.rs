use clap::Parser;

mod config;
mod handlers;
mod server;
mod session;
mod state;

use config::ServerConfig;
use server::run_server;
use state::AppState;

#[derive(Parser, Debug, Clone)]
#[command(name = "harry-server")]
#[command(about = "Harry avatar chat HTTP server")]
#[command(version)]
struct Cli {
    /// Listen host (overrides env)
    #[arg(long, env = "HARRY_HOST")]
    host: Option<String>,

    /// Listen port (overrides env)
    #[arg(long, env = "HARRY_PORT")]
    port: Option<u16>,

    /// Gemini model name (overrides env)
    #[arg(long, env = "GEMINI_MODEL")]
    model: Option<String>,

    /// Log level filter
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // 确定最终配置值（CLI 参数覆盖环境变量）
    let mut config = ServerConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(model) = cli.model {
        config.gemini_model = model;
    }

    tracing::info!("Starting Harry server on {}:{}", config.host, config.port);
    tracing::info!("  Gemini model: {}", config.gemini_model);
    tracing::info!(
        "  Gemini key configured: {}",
        config.gemini_api_key.is_some()
    );
    tracing::info!("  Production mode: {}", config.production);

    let state = AppState::from_config(&config);

    run_server(state, &config.host, config.port).await
}
