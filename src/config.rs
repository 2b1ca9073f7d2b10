use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Username the bot is registered under, without the leading '@'.
    pub bot_username: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Missing environment variable: {}", key))
        };

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: require("TELEGRAM_TOKEN")?,
                bot_username: require("BOT_USERNAME")?,
            },
            gemini: GeminiConfig {
                api_key: require("GEMINI_API_KEY")?,
                model: lookup("GEMINI_MODEL").unwrap_or_else(default_model),
                base_url: default_base_url(),
            },
        })
    }
}
