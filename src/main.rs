mod bot;
mod config;
mod gemini;
mod message;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gembot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config =
        Config::from_env().context("Failed to load configuration from the environment")?;

    info!("Configuration loaded");
    info!("  Model: {}", config.gemini.model);
    info!("  Bot username: @{}", config.telegram.bot_username);

    // Create shared state
    let state = Arc::new(AppState::new(config));

    // Run the Telegram bot
    info!("Bot is starting...");
    bot::run(state).await?;

    Ok(())
}
