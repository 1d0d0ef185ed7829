//! Command-line front end for the wikibot pipeline.
//!
//! Shares configuration and the answer cache with the bot, which makes it
//! handy for warming the cache or checking what a query resolves to.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wikibot_client::{WikiClient, WikiConfig};
use wikibot_core::{AppConfig, Answer, CacheDb, CacheKey, CachedAnswer, Pipeline, PipelineResult, PipelineSettings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a query through cache and encyclopedia, caching the answer
    Ask {
        /// Query words, joined with spaces
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the cached answer for a query without touching the network
    Cached {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    let cache = CacheDb::open(&config.db_path).await?;

    match cli.command {
        Commands::Ask { query } => {
            let wiki = WikiClient::new(WikiConfig::from(&config))?;
            let pipeline = Pipeline::new(cache, Arc::new(wiki), PipelineSettings::from(&config));
            let result = pipeline.resolve(&query.join(" ")).await;
            println!("{}", render_result(&result));
        }
        Commands::Cached { query } => {
            let key = CacheKey::normalize(&query.join(" "));
            let cached = cache.get_answer(&key).await?;
            println!("{}", render_cached(&key, cached.as_ref()));
        }
    }

    Ok(())
}

fn render_answer(answer: &Answer) -> String {
    let mut out = answer.text.clone();
    if let Some(image) = &answer.image {
        out.push_str(&format!("\n\nimage: {image}"));
    }
    for action in &answer.actions {
        match &action.target {
            Some(target) => out.push_str(&format!("\n[{}] {}", action.label, target)),
            None => out.push_str(&format!("\n[{}]", action.label)),
        }
    }
    out
}

fn render_result(result: &PipelineResult) -> String {
    match result {
        PipelineResult::Answer(answer) => render_answer(answer),
        PipelineResult::Message(message) => message.clone(),
    }
}

fn render_cached(key: &CacheKey, cached: Option<&CachedAnswer>) -> String {
    match cached {
        Some(row) => format!("key: {}\n\n{}", row.key, render_answer(&row.answer)),
        None => format!("no cached answer for \"{key}\""),
    }
}
