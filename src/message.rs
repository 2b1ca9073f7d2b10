//! Platform-independent view of an inbound message and the reply decision.

/// Whether the chat is a one-on-one conversation or a group-like chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Direct,
    Group,
}

/// A platform-supplied @-mention marker, as a byte range into the message text.
#[derive(Debug, Clone, Copy)]
pub struct MentionSpan {
    pub offset: usize,
    pub length: usize,
}

/// A message received from the platform, reduced to what the reply decision needs.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub chat_kind: ChatKind,
    pub text: Option<String>,
    pub mentions: Vec<MentionSpan>,
}

/// Decides whether a message gets a reply and extracts the question text.
///
/// Direct chats always get a reply. In group chats the bot only answers when
/// one of the mention spans contains its username (case-insensitive,
/// substring match); the question is then the full message text, mention
/// included. Spans that don't map to a valid slice of the text are skipped.
pub fn question_for(message: &IncomingMessage, bot_username: &str) -> Option<String> {
    let text = message.text.as_deref()?;

    if message.chat_kind == ChatKind::Direct {
        return Some(text.to_string());
    }

    let needle = bot_username.to_lowercase();
    let mentioned = message.mentions.iter().any(|span| {
        text.get(span.offset..span.offset.saturating_add(span.length))
            .map(|slice| slice.to_lowercase().contains(&needle))
            .unwrap_or(false)
    });

    if mentioned {
        Some(text.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(text: &str) -> IncomingMessage {
        IncomingMessage {
            chat_id: 1,
            chat_kind: ChatKind::Direct,
            text: Some(text.to_string()),
            mentions: Vec::new(),
        }
    }

    fn group(text: &str, mentions: Vec<MentionSpan>) -> IncomingMessage {
        IncomingMessage {
            chat_id: -100,
            chat_kind: ChatKind::Group,
            text: Some(text.to_string()),
            mentions,
        }
    }

    fn span(offset: usize, length: usize) -> MentionSpan {
        MentionSpan { offset, length }
    }

    #[test]
    fn test_direct_chat_always_answers() {
        let msg = direct("What is 2+2?");
        assert_eq!(question_for(&msg, "gembot").as_deref(), Some("What is 2+2?"));
    }

    #[test]
    fn test_direct_chat_ignores_mentions() {
        let mut msg = direct("@someone hello");
        msg.mentions.push(span(0, 8));
        assert_eq!(
            question_for(&msg, "gembot").as_deref(),
            Some("@someone hello")
        );
    }

    #[test]
    fn test_no_text_is_skipped() {
        let mut msg = direct("");
        msg.text = None;
        assert_eq!(question_for(&msg, "gembot"), None);
    }

    #[test]
    fn test_group_without_mentions_is_skipped() {
        let msg = group("hello everyone", Vec::new());
        assert_eq!(question_for(&msg, "gembot"), None);
    }

    #[test]
    fn test_group_mention_of_bot_answers_with_full_text() {
        let msg = group("@gembot what time is it", vec![span(0, 7)]);
        assert_eq!(
            question_for(&msg, "gembot").as_deref(),
            Some("@gembot what time is it")
        );
    }

    #[test]
    fn test_group_mention_matches_case_insensitively() {
        let msg = group("@GemBot ping", vec![span(0, 7)]);
        assert_eq!(question_for(&msg, "gembot").as_deref(), Some("@GemBot ping"));
    }

    #[test]
    fn test_group_mention_of_someone_else_is_skipped() {
        let msg = group("@alice what time is it", vec![span(0, 6)]);
        assert_eq!(question_for(&msg, "gembot"), None);
    }

    #[test]
    fn test_mention_containing_username_as_substring_matches() {
        // The check is a substring test, so a longer username that contains
        // ours still triggers a reply.
        let msg = group("@gembot_staging deploy?", vec![span(0, 15)]);
        assert_eq!(
            question_for(&msg, "gembot").as_deref(),
            Some("@gembot_staging deploy?")
        );
    }

    #[test]
    fn test_out_of_range_span_is_skipped_without_panicking() {
        let msg = group("short", vec![span(2, usize::MAX), span(40, 4)]);
        assert_eq!(question_for(&msg, "gembot"), None);
    }

    #[test]
    fn test_span_not_on_char_boundary_is_skipped() {
        // "héllo" — the span starts inside the two-byte 'é'.
        let msg = group("héllo @gembot", vec![span(2, 3)]);
        assert_eq!(question_for(&msg, "gembot"), None);
    }
}
