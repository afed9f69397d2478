use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tarobot::application::events::PrecheckoutPolicy;
use tarobot::domain::ports::ReadingOracleRef;
use tarobot::infrastructure::canned::CannedOracle;
use tarobot::infrastructure::in_memory::InMemoryPendingStore;
use tarobot::infrastructure::openai::OpenAiOracle;
use tarobot::infrastructure::telegram::TelegramApi;
use tarobot::interfaces::http::{router, state::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Public base URL registered by /setwebhook
    #[arg(long, env = "PUBLIC_URL")]
    public_url: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// OpenAI API key; when absent, a canned oracle is used
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let telegram = Arc::new(TelegramApi::new(cli.bot_token).into_diagnostic()?);

    let oracle: ReadingOracleRef = match cli.openai_api_key.filter(|key| !key.is_empty()) {
        Some(key) => {
            info!("using OpenAI reading oracle");
            Arc::new(OpenAiOracle::new(key).into_diagnostic()?)
        }
        None => {
            info!("no OpenAI API key configured, using canned oracle");
            Arc::new(CannedOracle::new())
        }
    };

    let state = AppState::new(
        Arc::new(InMemoryPendingStore::new()),
        telegram.clone(),
        telegram,
        oracle,
        PrecheckoutPolicy::default(),
        cli.public_url,
    );

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .into_diagnostic()?;
    info!(addr = %cli.bind, "listening");
    axum::serve(listener, router(state)).await.into_diagnostic()?;

    Ok(())
}
