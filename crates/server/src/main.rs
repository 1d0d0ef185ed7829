//! wikibot entry point.
//!
//! Boots the Telegram long-polling bot in front of the resolve-and-cache
//! pipeline. Logs go to stderr as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use wikibot_client::{WikiClient, WikiConfig};
use wikibot_core::{AppConfig, CacheDb, Pipeline, PipelineSettings};

mod animation;
mod handler;
mod history;
mod poll;
mod telegram;

use handler::{Bot, BotSettings};
use telegram::BotApi;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().inspect_err(|e| tracing::error!(error = %e, "failed to load configuration"))?;
    let token = config
        .require_telegram_token()
        .inspect_err(|e| tracing::error!(error = %e, "cannot start without a bot token"))?;

    let cache = CacheDb::open(&config.db_path)
        .await
        .inspect_err(|e| tracing::error!(error = %e, db = %config.db_path.display(), "failed to open answer cache"))?;
    let wiki = WikiClient::new(WikiConfig::from(&config))?;
    let pipeline = Pipeline::new(cache, Arc::new(wiki), PipelineSettings::from(&config));

    let api = Arc::new(BotApi::new(&config.telegram_api_url, token, config.timeout())?);
    let bot = Arc::new(Bot::new(api.clone(), pipeline, BotSettings::from(&config)));

    tracing::info!(
        primary = %config.primary_lang,
        fallback = %config.fallback_lang,
        db = %config.db_path.display(),
        "Starting wikibot"
    );

    poll::run(&api, bot, Duration::from_secs(config.poll_timeout_secs), shutdown_signal()).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
