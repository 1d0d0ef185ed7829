//! Update dispatch for the Telegram bot.
//!
//! `/start` greets, `/history` lists the caller's recent queries and any other
//! text is resolved through the pipeline. Other commands are ignored.

use std::sync::Arc;
use std::time::Duration;

use wikibot_core::format::clamp_caption;
use wikibot_core::format::markup::escape;
use wikibot_core::{AppConfig, Pipeline, PipelineResult, messages};

use crate::animation::{Animation, PLACEHOLDER};
use crate::history::History;
use crate::telegram::{ChatApi, InlineKeyboardMarkup, Message, ParseMode, Update};

const NO_HISTORY: &str = "Siz hali hech narsa qidirmadingiz.";

/// Bot behavior knobs taken from the application config.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub resolve_timeout: Duration,
    pub animation_interval: Duration,
    pub history_capacity: usize,
    pub history_shown: usize,
    pub max_caption_len: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for BotSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            resolve_timeout: config.resolve_timeout(),
            animation_interval: config.animation_interval(),
            history_capacity: config.history_capacity,
            history_shown: config.history_shown,
            max_caption_len: config.max_caption_len,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Start,
    History,
    Unknown(&'a str),
    Search(&'a str),
}

fn parse_command(text: &str) -> Command<'_> {
    let Some(rest) = text.trim_start().strip_prefix('/') else {
        return Command::Search(text);
    };

    // `/start@SomeBot args` in group chats
    let name = rest
        .split_whitespace()
        .next()
        .and_then(|word| word.split('@').next())
        .unwrap_or_default();

    match name {
        "start" => Command::Start,
        "history" => Command::History,
        other => Command::Unknown(other),
    }
}

/// How a pipeline result goes out to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Photo with a clamped caption; `text` is sent instead if the photo is refused.
    Photo { url: String, caption: String, text: String, keyboard: Option<InlineKeyboardMarkup> },
    Text { text: String, parse_mode: Option<ParseMode>, keyboard: Option<InlineKeyboardMarkup> },
}

/// Decide how to deliver a pipeline result.
///
/// Answers carry Markdown and an action keyboard. Messages are plain text,
/// since they embed the user's query verbatim.
pub fn plan_reply(result: PipelineResult, max_caption_len: usize) -> Reply {
    match result {
        PipelineResult::Answer(answer) => {
            let keyboard = InlineKeyboardMarkup::from_actions(&answer.actions);
            match answer.image {
                Some(url) => Reply::Photo {
                    url,
                    caption: clamp_caption(&answer.text, max_caption_len),
                    text: answer.text,
                    keyboard,
                },
                None => Reply::Text { text: answer.text, parse_mode: Some(ParseMode::Markdown), keyboard },
            }
        }
        PipelineResult::Message(text) => Reply::Text { text, parse_mode: None, keyboard: None },
    }
}

fn greeting(first_name: Option<&str>) -> String {
    let salutation = match first_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Salom, {}! 👋", escape(name)),
        None => "Salom! 👋".to_string(),
    };

    format!(
        "{salutation}\n\n\
         *Men Vikipediya botiman.*\n\
         Sizga kerakli bilimlarni topishda yordam beraman.\n\n\
         Nimani bilmoqchisiz? Yozing, men sizga ma'lumot topib beraman.\n\n\
         Misol:\n• Python\n• O'zbekiston\n• Elon Musk"
    )
}

/// The Telegram front end of the pipeline.
pub struct Bot {
    api: Arc<dyn ChatApi>,
    pipeline: Pipeline,
    history: History,
    settings: BotSettings,
}

impl Bot {
    pub fn new(api: Arc<dyn ChatApi>, pipeline: Pipeline, settings: BotSettings) -> Self {
        Self { api, pipeline, history: History::new(settings.history_capacity), settings }
    }

    /// Handle one update. Failures are logged; nothing propagates to the poller.
    pub async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };

        match parse_command(text) {
            Command::Start => self.start(&message).await,
            Command::History => self.show_history(&message).await,
            Command::Unknown(name) => tracing::debug!(command = name, "ignoring unknown command"),
            Command::Search(query) => self.search(&message, query).await,
        }
    }

    async fn start(&self, message: &Message) {
        let first_name = message.from.as_ref().map(|user| user.first_name.as_str());
        self.send_text(message.chat.id, &greeting(first_name), Some(ParseMode::Markdown), None)
            .await;
    }

    async fn show_history(&self, message: &Message) {
        let queries = self
            .history
            .recent(user_id(message), self.settings.history_shown)
            .await;

        let text =
            if queries.is_empty() { NO_HISTORY.to_string() } else { format!("Sizning tarixingiz:\n{}", queries.join("\n")) };
        self.send_text(message.chat.id, &text, None, None).await;
    }

    async fn search(&self, message: &Message, query: &str) {
        let chat_id = message.chat.id;
        tracing::info!(chat_id, query, "search requested");
        self.history.record(user_id(message), query).await;

        let placeholder = match self.api.send_message(chat_id, PLACEHOLDER, None, None).await {
            Ok(sent) => Some(sent.message_id),
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "failed to send placeholder");
                None
            }
        };
        let animation =
            placeholder.map(|id| Animation::start(self.api.clone(), chat_id, id, self.settings.animation_interval));

        let result = match tokio::time::timeout(self.settings.resolve_timeout, self.pipeline.resolve(query)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(chat_id, query, timeout = ?self.settings.resolve_timeout, "resolve timed out");
                PipelineResult::Message(messages::LOOKUP_FAILED.to_string())
            }
        };

        if let Some(animation) = animation {
            animation.stop().await;
        }
        if let Some(id) = placeholder {
            if let Err(e) = self.api.delete_message(chat_id, id).await {
                tracing::warn!(chat_id, error = %e, "failed to delete placeholder");
            }
        }

        self.deliver(chat_id, plan_reply(result, self.settings.max_caption_len))
            .await;
    }

    async fn deliver(&self, chat_id: i64, reply: Reply) {
        match reply {
            Reply::Photo { url, caption, text, keyboard } => {
                let sent = self
                    .api
                    .send_photo(chat_id, &url, &caption, Some(ParseMode::Markdown), keyboard.as_ref())
                    .await;
                if let Err(e) = sent {
                    if e.is_bad_request() {
                        tracing::warn!(chat_id, photo = %url, error = %e, "photo rejected, sending text instead");
                    } else {
                        tracing::error!(chat_id, photo = %url, error = %e, "photo send failed, sending text instead");
                    }
                    self.send_text(chat_id, &text, Some(ParseMode::Markdown), keyboard.as_ref())
                        .await;
                }
            }
            Reply::Text { text, parse_mode, keyboard } => {
                self.send_text(chat_id, &text, parse_mode, keyboard.as_ref()).await;
            }
        }
    }

    async fn send_text(
        &self, chat_id: i64, text: &str, parse_mode: Option<ParseMode>, keyboard: Option<&InlineKeyboardMarkup>,
    ) {
        if let Err(e) = self.api.send_message(chat_id, text, parse_mode, keyboard).await {
            tracing::error!(chat_id, error = %e, "failed to send message");
        }
    }
}

/// History is per user; messages without a sender fall back to the chat.
fn user_id(message: &Message) -> i64 {
    message.from.as_ref().map_or(message.chat.id, |user| user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::TelegramError;
    use crate::telegram::types::{Chat, User};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, Ordering};
    use wikibot_core::{Answer, CacheDb, KbFault, KnowledgeBase, LinkAction, Lookup, Page, PipelineSettings};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Text { text: String, markdown: bool, buttons: usize },
        Photo { photo: String, caption: String },
        Edit,
        Delete { message_id: i64 },
    }

    #[derive(Default)]
    struct FakeChat {
        calls: Mutex<Vec<Call>>,
        reject_photos: bool,
        next_id: AtomicI64,
    }

    impl FakeChat {
        fn sent(&self, chat_id: i64) -> Message {
            let message_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
            Message { message_id, chat: Chat { id: chat_id }, from: None, text: None }
        }

        /// Everything except animation edits, whose count depends on timing.
        fn visible_calls(&self) -> Vec<Call> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|call| **call != Call::Edit)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl ChatApi for FakeChat {
        async fn send_message(
            &self, chat_id: i64, text: &str, parse_mode: Option<ParseMode>, keyboard: Option<&InlineKeyboardMarkup>,
        ) -> Result<Message, TelegramError> {
            self.calls.lock().unwrap().push(Call::Text {
                text: text.to_string(),
                markdown: parse_mode.is_some(),
                buttons: keyboard.map_or(0, |k| k.inline_keyboard.len()),
            });
            Ok(self.sent(chat_id))
        }

        async fn send_photo(
            &self, chat_id: i64, photo: &str, caption: &str, _: Option<ParseMode>, _: Option<&InlineKeyboardMarkup>,
        ) -> Result<Message, TelegramError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Photo { photo: photo.to_string(), caption: caption.to_string() });
            if self.reject_photos {
                return Err(TelegramError::Api { code: 400, description: "Bad Request: wrong type of the web page content".into() });
            }
            Ok(self.sent(chat_id))
        }

        async fn edit_message_text(&self, _: i64, _: i64, _: &str) -> Result<(), TelegramError> {
            self.calls.lock().unwrap().push(Call::Edit);
            Ok(())
        }

        async fn delete_message(&self, _: i64, message_id: i64) -> Result<(), TelegramError> {
            self.calls.lock().unwrap().push(Call::Delete { message_id });
            Ok(())
        }
    }

    /// Answers from a fixed table; unknown editions have no page.
    struct StaticKb(HashMap<&'static str, Lookup>);

    #[async_trait]
    impl KnowledgeBase for StaticKb {
        async fn lookup(&self, _topic: &str, lang: &str) -> Result<Lookup, KbFault> {
            Ok(self.0.get(lang).cloned().unwrap_or(Lookup::NotFound))
        }
    }

    struct StalledKb;

    #[async_trait]
    impl KnowledgeBase for StalledKb {
        async fn lookup(&self, _topic: &str, _lang: &str) -> Result<Lookup, KbFault> {
            std::future::pending().await
        }
    }

    fn page(images: Vec<&str>) -> Page {
        Page {
            title: "Python".into(),
            summary: "Python is a programming language. ".repeat(60),
            sections: vec![],
            url: "https://en.wikipedia.org/wiki/Python".into(),
            images: images.into_iter().map(String::from).collect(),
        }
    }

    async fn bot_with(api: Arc<FakeChat>, kb: Arc<dyn KnowledgeBase>, settings: BotSettings) -> Bot {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let pipeline = Pipeline::new(cache, kb, PipelineSettings::default());
        Bot::new(api, pipeline, settings)
    }

    fn text_update(user: i64, text: &str) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 1,
                chat: Chat { id: user },
                from: Some(User { id: user, first_name: "Ali_Vali".into() }),
                text: Some(text.to_string()),
            }),
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start"), Command::Start);
        assert_eq!(parse_command("/start@WikiBot"), Command::Start);
        assert_eq!(parse_command("/history please"), Command::History);
        assert_eq!(parse_command("/help"), Command::Unknown("help"));
        assert_eq!(parse_command("Elon Musk"), Command::Search("Elon Musk"));
    }

    #[test]
    fn test_plan_reply_message_is_plain_text() {
        let reply = plan_reply(PipelineResult::Message("❌ '*x*' topilmadi".into()), 1024);
        assert_eq!(reply, Reply::Text { text: "❌ '*x*' topilmadi".into(), parse_mode: None, keyboard: None });
    }

    #[test]
    fn test_plan_reply_answer_without_image() {
        let answer = Answer { text: "📌 *X*".into(), actions: vec![LinkAction::new("open", "https://x.org")], image: None };
        let Reply::Text { parse_mode, keyboard, .. } = plan_reply(PipelineResult::Answer(answer), 1024) else {
            panic!("expected text reply");
        };
        assert_eq!(parse_mode, Some(ParseMode::Markdown));
        assert_eq!(keyboard.unwrap().inline_keyboard.len(), 1);
    }

    #[test]
    fn test_plan_reply_clamps_caption() {
        let text = "a".repeat(3000);
        let answer = Answer { text: text.clone(), actions: vec![], image: Some("https://u.org/a.jpg".into()) };
        let Reply::Photo { caption, text: full, keyboard, .. } = plan_reply(PipelineResult::Answer(answer), 1024) else {
            panic!("expected photo reply");
        };
        assert!(caption.chars().count() <= 1024);
        assert_eq!(full, text);
        assert!(keyboard.is_none());
    }

    #[test]
    fn test_greeting_escapes_name() {
        assert!(greeting(Some("Ali_Vali")).starts_with("Salom, Ali\\_Vali! 👋"));
        assert!(greeting(None).starts_with("Salom! 👋"));
    }

    #[tokio::test]
    async fn test_start_sends_markdown_greeting() {
        let api = Arc::new(FakeChat::default());
        let bot = bot_with(api.clone(), Arc::new(StaticKb(HashMap::new())), BotSettings::default()).await;

        bot.handle_update(text_update(5, "/start")).await;

        let calls = api.visible_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Text { text, markdown: true, .. } if text.starts_with("Salom, Ali\\_Vali!")));
    }

    #[tokio::test]
    async fn test_history_empty_then_recorded() {
        let api = Arc::new(FakeChat::default());
        let bot = bot_with(api.clone(), Arc::new(StaticKb(HashMap::new())), BotSettings::default()).await;

        bot.handle_update(text_update(5, "/history")).await;
        bot.handle_update(text_update(5, "Qwxzv")).await;
        bot.handle_update(text_update(5, "/history")).await;

        let texts: Vec<String> = api
            .visible_calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts.first().map(String::as_str), Some(NO_HISTORY));
        assert_eq!(texts.last().map(String::as_str), Some("Sizning tarixingiz:\nQwxzv"));
    }

    #[tokio::test]
    async fn test_search_replaces_placeholder_with_answer() {
        let api = Arc::new(FakeChat::default());
        let kb = StaticKb(HashMap::from([("en", Lookup::Page(page(vec![])))]));
        let bot = bot_with(api.clone(), Arc::new(kb), BotSettings::default()).await;

        bot.handle_update(text_update(5, "Python")).await;

        let calls = api.visible_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::Text { text: PLACEHOLDER.into(), markdown: false, buttons: 0 });
        assert_eq!(calls[1], Call::Delete { message_id: 100 });
        assert!(matches!(&calls[2], Call::Text { text, markdown: true, buttons: 1 } if text.starts_with("📌 *Python*")));
    }

    #[tokio::test]
    async fn test_search_with_image_sends_photo() {
        let api = Arc::new(FakeChat::default());
        let kb = StaticKb(HashMap::from([("uz", Lookup::Page(page(vec!["https://upload.example/Python.png"])))]));
        let bot = bot_with(api.clone(), Arc::new(kb), BotSettings::default()).await;

        bot.handle_update(text_update(5, "Python")).await;

        let calls = api.visible_calls();
        assert_eq!(calls.len(), 3);
        let Call::Photo { photo, caption } = &calls[2] else { panic!("expected photo, got {:?}", calls[2]) };
        assert_eq!(photo, "https://upload.example/Python.png");
        assert!(caption.chars().count() <= 1024);
    }

    #[tokio::test]
    async fn test_rejected_photo_falls_back_to_text() {
        let api = Arc::new(FakeChat { reject_photos: true, ..Default::default() });
        let kb = StaticKb(HashMap::from([("uz", Lookup::Page(page(vec!["https://upload.example/Python.jpg"])))]));
        let bot = bot_with(api.clone(), Arc::new(kb), BotSettings::default()).await;

        bot.handle_update(text_update(5, "Python")).await;

        let calls = api.visible_calls();
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[2], Call::Photo { .. }));
        assert!(matches!(&calls[3], Call::Text { text, markdown: true, buttons: 1 } if text.chars().count() > 1024));
    }

    #[tokio::test]
    async fn test_not_found_is_plain_message() {
        let api = Arc::new(FakeChat::default());
        let bot = bot_with(api.clone(), Arc::new(StaticKb(HashMap::new())), BotSettings::default()).await;

        bot.handle_update(text_update(5, "Qwxzv")).await;

        let calls = api.visible_calls();
        assert_eq!(calls.last(), Some(&Call::Text { text: messages::not_found("Qwxzv"), markdown: false, buttons: 0 }));
    }

    #[tokio::test]
    async fn test_resolve_timeout_reports_failure() {
        let api = Arc::new(FakeChat::default());
        let settings = BotSettings {
            resolve_timeout: Duration::from_millis(200),
            animation_interval: Duration::from_millis(50),
            ..Default::default()
        };
        let bot = bot_with(api.clone(), Arc::new(StalledKb), settings).await;

        bot.handle_update(text_update(5, "Python")).await;

        let calls = api.visible_calls();
        assert_eq!(calls[1], Call::Delete { message_id: 100 });
        assert_eq!(
            calls.last(),
            Some(&Call::Text { text: messages::LOOKUP_FAILED.into(), markdown: false, buttons: 0 })
        );
        assert!(api.calls.lock().unwrap().contains(&Call::Edit));
    }

    #[tokio::test]
    async fn test_ignores_unknown_commands_and_non_text() {
        let api = Arc::new(FakeChat::default());
        let bot = bot_with(api.clone(), Arc::new(StaticKb(HashMap::new())), BotSettings::default()).await;

        bot.handle_update(text_update(5, "/help")).await;
        bot.handle_update(Update { update_id: 2, message: None }).await;

        assert!(api.visible_calls().is_empty());
    }
}
