use anyhow::Result;
use tracing_subscriber::EnvFilter;

use mood_suggest::config::{Config, Mode};
use mood_suggest::{build_state, server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::load();

    match config.mode() {
        Mode::Mock if !config.has_api_key() => {
            tracing::warn!("GEMINI_API_KEY not found. App will run in MOCK MODE.")
        }
        Mode::Mock => tracing::info!("USE_MOCK_MODE is set. App will run in MOCK MODE."),
        Mode::Live => tracing::info!(model = %config.gemini.model, "Using Gemini API"),
    }

    let state = build_state(&config)?;
    server::run(&config.server, state).await?;
    Ok(())
}
