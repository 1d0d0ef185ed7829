//! Long-polling loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::handler::Bot;
use crate::telegram::BotApi;

/// Pause after a failed getUpdates before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Poll for updates until `shutdown` resolves, handling each update on its own task.
///
/// In-flight handlers are not awaited on shutdown.
pub async fn run(api: &BotApi, bot: Arc<Bot>, poll_timeout: Duration, shutdown: impl Future<Output = ()>) {
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown requested, polling stopped");
                return;
            }
            polled = api.get_updates(offset, poll_timeout) => match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        let bot = Arc::clone(&bot);
                        tokio::spawn(async move { bot.handle_update(update).await });
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
