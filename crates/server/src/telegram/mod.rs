//! Telegram Bot API client.
//!
//! Every method is a JSON `POST` to `{api_url}/bot{token}/{method}`; responses
//! share the `{ok, result, description, error_code}` envelope. Only the
//! handful of methods the bot needs are covered.

pub mod error;
pub mod types;

pub use error::TelegramError;
pub use types::{InlineKeyboardMarkup, Message, ParseMode, Update};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use types::{ApiResponse, DeleteMessage, EditMessageText, GetUpdates, SendMessage, SendPhoto};

/// Extra time granted to a long poll on top of its server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Outgoing chat operations used by the bot.
///
/// [`BotApi`] implements this over HTTP; handlers only depend on the trait.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_message(
        &self, chat_id: i64, text: &str, parse_mode: Option<ParseMode>, keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError>;

    async fn send_photo(
        &self, chat_id: i64, photo: &str, caption: &str, parse_mode: Option<ParseMode>,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError>;

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), TelegramError>;

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError>;
}

/// Telegram Bot API client.
#[derive(Clone)]
pub struct BotApi {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for BotApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApi").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

impl BotApi {
    /// Create a client for the bot identified by `token`.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TelegramError::Network(Arc::new(e)))?;

        Ok(Self { http, base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token), timeout })
    }

    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let http_response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(method, %status, "Telegram API response");

        let bytes = http_response.bytes().await?;
        let envelope: ApiResponse<R> = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Api {
                    code: status.as_u16(),
                    description: status.canonical_reason().unwrap_or("unknown").to_string(),
                });
            }
            Err(e) => return Err(TelegramError::Parse(e.to_string())),
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(status.as_u16()),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::Parse(format!("{method}: ok response without result")))
    }

    /// Long-poll for updates after `offset`.
    ///
    /// The request is held open by Telegram for up to `poll_timeout`.
    pub async fn get_updates(&self, offset: Option<i64>, poll_timeout: Duration) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates { offset, timeout: poll_timeout.as_secs(), allowed_updates: &["message"] };
        self.call("getUpdates", &params, poll_timeout + POLL_GRACE).await
    }
}

#[async_trait]
impl ChatApi for BotApi {
    async fn send_message(
        &self, chat_id: i64, text: &str, parse_mode: Option<ParseMode>, keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let params = SendMessage { chat_id, text, parse_mode, reply_markup: keyboard };
        self.call("sendMessage", &params, self.timeout).await
    }

    async fn send_photo(
        &self, chat_id: i64, photo: &str, caption: &str, parse_mode: Option<ParseMode>,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let params = SendPhoto { chat_id, photo, caption, parse_mode, reply_markup: keyboard };
        self.call("sendPhoto", &params, self.timeout).await
    }

    async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<(), TelegramError> {
        let params = EditMessageText { chat_id, message_id, text };
        // `result` is the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", &params, self.timeout).await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        let params = DeleteMessage { chat_id, message_id };
        let _: bool = self.call("deleteMessage", &params, self.timeout).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use types::InlineKeyboardButton;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123:secret";

    fn api_for(server: &MockServer) -> BotApi {
        BotApi::new(&server.uri(), TOKEN, Duration::from_secs(5)).unwrap()
    }

    fn sent(message_id: i64, chat_id: i64) -> serde_json::Value {
        json!({"ok": true, "result": {"message_id": message_id, "date": 0, "chat": {"id": chat_id, "type": "private"}}})
    }

    #[tokio::test]
    async fn test_send_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/sendMessage"))
            .and(body_partial_json(json!({"chat_id": 42, "text": "*hi*", "parse_mode": "Markdown"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent(9, 42)))
            .expect(1)
            .mount(&server)
            .await;

        let message = api_for(&server)
            .send_message(42, "*hi*", Some(ParseMode::Markdown), None)
            .await
            .unwrap();
        assert_eq!(message.message_id, 9);
        assert_eq!(message.chat.id, 42);
    }

    #[tokio::test]
    async fn test_send_photo_with_keyboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/sendPhoto"))
            .and(body_partial_json(json!({
                "photo": "https://upload.example/a.jpg",
                "reply_markup": {"inline_keyboard": [[{"text": "open", "url": "https://example.org"}]]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent(10, 42)))
            .expect(1)
            .mount(&server)
            .await;

        let keyboard = InlineKeyboardMarkup {
            inline_keyboard: vec![vec![InlineKeyboardButton { text: "open".into(), url: "https://example.org".into() }]],
        };
        api_for(&server)
            .send_photo(42, "https://upload.example/a.jpg", "caption", None, Some(&keyboard))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/sendPhoto"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: wrong file identifier/HTTP URL specified"
            })))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .send_photo(1, "https://bad.example/x.jpg", "c", None, None)
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.to_string().contains("wrong file identifier"));
    }

    #[tokio::test]
    async fn test_non_json_error_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = api_for(&server).delete_message(1, 2).await.unwrap_err();
        assert!(matches!(err, TelegramError::Api { code: 502, .. }));
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/editMessageText"))
            .and(body_partial_json(json!({"chat_id": 1, "message_id": 2, "text": "⏳ Qidirilmoqda."})))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent(2, 1)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/deleteMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server);
        api.edit_message_text(1, 2, "⏳ Qidirilmoqda.").await.unwrap();
        api.delete_message(1, 2).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_updates_sends_offset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/getUpdates"))
            .and(body_partial_json(json!({"offset": 11, "timeout": 0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": [
                {"update_id": 11, "message": {"message_id": 1, "chat": {"id": 5}, "text": "/start"}}
            ]})))
            .mount(&server)
            .await;

        let updates = api_for(&server).get_updates(Some(11), Duration::ZERO).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 11);
    }

    #[test]
    fn test_debug_hides_token() {
        let api = BotApi::new("https://api.telegram.org", TOKEN, Duration::from_secs(1)).unwrap();
        assert!(!format!("{api:?}").contains("secret"));
    }
}
