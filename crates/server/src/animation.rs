//! "Searching" placeholder animation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::telegram::ChatApi;

pub const PLACEHOLDER: &str = "⏳ Qidirilmoqda...";

const BASE: &str = "⏳ Qidirilmoqda";
const DOTS: [&str; 4] = ["", ".", "..", "..."];

/// Frame `i` of the animation.
pub fn frame(i: usize) -> String {
    format!("{BASE}{}", DOTS[i % DOTS.len()])
}

/// A running animation that edits a placeholder message until stopped.
///
/// The first failed edit ends the animation on its own.
pub struct Animation {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Animation {
    pub fn start(api: Arc<dyn ChatApi>, chat_id: i64, message_id: i64, interval: Duration) -> Self {
        let (stop, stopped) = oneshot::channel();
        let task = tokio::spawn(animate(api, chat_id, message_id, interval, stopped));
        Self { stop, task }
    }

    /// Signal the animation and wait for its last edit to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "animation task failed");
        }
    }
}

async fn animate(
    api: Arc<dyn ChatApi>, chat_id: i64, message_id: i64, interval: Duration, mut stopped: oneshot::Receiver<()>,
) {
    for i in 0.. {
        if let Err(e) = api.edit_message_text(chat_id, message_id, &frame(i)).await {
            tracing::warn!(chat_id, error = %e, "placeholder edit failed, animation stopped");
            return;
        }

        tokio::select! {
            _ = &mut stopped => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
