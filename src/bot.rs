use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::MessageEntityKind;
use tracing::{info, warn};

use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::message::{question_for, ChatKind, IncomingMessage, MentionSpan};

/// Greeting sent in response to /start.
const GREETING: &str = "Hi! I'm Gemini AI. Tag me in a group or talk to me directly!";

/// Shared application state
pub struct AppState {
    gemini: GeminiClient,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let gemini = GeminiClient::new(config.gemini.clone());
        Self { gemini, config }
    }
}

/// Start the Telegram bot
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let bot = Bot::new(&state.config.telegram.bot_token);

    info!("Starting Telegram bot...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("gembot"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    // Handle /start command (delivered as "/start@botname" in groups)
    if text == "/start" || text.starts_with("/start@") {
        bot.send_message(msg.chat.id, GREETING).await?;
        return Ok(());
    }

    // Other commands are not ours; leave them unanswered
    if text.starts_with('/') {
        return Ok(());
    }

    let incoming = incoming_from(&msg);

    let question = match question_for(&incoming, &state.config.telegram.bot_username) {
        Some(q) => q,
        None => return Ok(()),
    };

    info!("Question from chat {}: {}", incoming.chat_id, question);

    // Send "typing" indicator
    bot.send_chat_action(msg.chat.id, teloxide::types::ChatAction::Typing)
        .await
        .ok();

    let reply = state.gemini.answer(&question).await;

    // Split long replies (Telegram has a 4096 char limit)
    for chunk in split_message(&reply, 4000) {
        bot.send_message(msg.chat.id, chunk).await.ok();
    }

    Ok(())
}

/// Reduce a Telegram message to the platform-independent view used by the
/// reply decision. Entity offsets are converted from UTF-16 code units to
/// byte ranges by teloxide's entity parser.
fn incoming_from(msg: &Message) -> IncomingMessage {
    let chat_kind = if msg.chat.is_private() {
        ChatKind::Direct
    } else {
        ChatKind::Group
    };

    let mentions = msg
        .parse_entities()
        .unwrap_or_default()
        .iter()
        .filter(|entity| matches!(entity.kind(), MessageEntityKind::Mention))
        .map(|entity| {
            let range = entity.range();
            MentionSpan {
                offset: range.start,
                length: range.len(),
            }
        })
        .collect();

    IncomingMessage {
        chat_id: msg.chat.id.0,
        chat_kind,
        text: msg.text().map(|t| t.to_string()),
        mentions,
    }
}

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.len() > max_len {
        let mut cut = max_len;
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let split_at = rest[..cut]
            .rfind('\n')
            .or_else(|| rest[..cut].rfind(' '))
            .map(|pos| pos + 1)
            .unwrap_or(cut);

        chunks.push(rest[..split_at].to_string());
        rest = &rest[split_at..];
    }

    chunks.push(rest.to_string());
    chunks
}
