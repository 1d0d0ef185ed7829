//! Bot API objects, limited to the fields the bot reads or sends.

use serde::{Deserialize, Serialize};
use wikibot_core::LinkAction;

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
}

/// Text formatting mode understood by Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown: `*bold*`, `_italic_`, `` `code` ``, `[text](url)`.
    Markdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    /// One URL button per row. Actions without a target have nothing to open
    /// and are left out.
    pub fn from_actions(actions: &[LinkAction]) -> Option<Self> {
        let rows: Vec<_> = actions
            .iter()
            .filter_map(|action| {
                action
                    .target
                    .as_ref()
                    .map(|url| vec![InlineKeyboardButton { text: action.label.clone(), url: url.clone() }])
            })
            .collect();

        if rows.is_empty() { None } else { Some(Self { inline_keyboard: rows }) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendPhoto<'a> {
    pub chat_id: i64,
    pub photo: &'a str,
    pub caption: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditMessageText<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_update() {
        let json = r#"{
            "update_id": 10000,
            "message": {
                "message_id": 1365,
                "date": 1441645532,
                "chat": {"id": 1111111, "type": "private", "first_name": "Test"},
                "from": {"id": 1111111, "is_bot": false, "first_name": "Test"},
                "text": "Elon Musk"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 1111111);
        assert_eq!(message.text.as_deref(), Some("Elon Musk"));
        assert_eq!(message.from.unwrap().first_name, "Test");
    }

    #[test]
    fn test_parse_update_without_message() {
        let json = r#"{"update_id": 7, "edited_message": {"message_id": 1, "chat": {"id": 1}}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn test_keyboard_one_button_per_row() {
        let actions = vec![
            LinkAction::new("🔗 Read (EN)", "https://en.wikipedia.org/wiki/X"),
            LinkAction { label: "no target".into(), target: None },
            LinkAction::new("🔗 Read (UZ)", "https://uz.wikipedia.org/wiki/X"),
        ];
        let keyboard = InlineKeyboardMarkup::from_actions(&actions).unwrap();
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(keyboard.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(keyboard.inline_keyboard[1][0].url, "https://uz.wikipedia.org/wiki/X");
    }

    #[test]
    fn test_keyboard_empty_actions() {
        assert!(InlineKeyboardMarkup::from_actions(&[]).is_none());
        assert!(InlineKeyboardMarkup::from_actions(&[LinkAction { label: "x".into(), target: None }]).is_none());
    }

    #[test]
    fn test_send_message_skips_absent_fields() {
        let body = serde_json::to_value(SendMessage { chat_id: 5, text: "hi", parse_mode: None, reply_markup: None })
            .unwrap();
        assert_eq!(body, serde_json::json!({"chat_id": 5, "text": "hi"}));

        let body = serde_json::to_value(SendMessage {
            chat_id: 5,
            text: "*hi*",
            parse_mode: Some(ParseMode::Markdown),
            reply_markup: None,
        })
        .unwrap();
        assert_eq!(body["parse_mode"], "Markdown");
    }
}
