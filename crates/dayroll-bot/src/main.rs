mod display;
mod handlers;
mod keyboard;
mod scheduler;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dayroll_core::{CoreConfig, StateStore};
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "dayroll-bot")]
#[command(about = "Telegram bot keeping one daily list per forum topic")]
struct Args {
    /// Path to a JSON config file (token, data_dir, daily_hour, timezone)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = CoreConfig::load(args.config.as_deref())?;
    std::fs::create_dir_all(&config.data_dir).context("create data_dir")?;

    let store = StateStore::open(config.state_file());
    let bot = Bot::new(config.token.clone());
    let state = Arc::new(AppState::new(config, store));

    // Reinstall one daily job per enabled topic; restarts must not lose
    // the recurring announcements.
    {
        let topics = state.store.lock().await.enabled_topics();
        let mut jobs = state.jobs.lock().await;
        for topic in topics {
            jobs.install(
                topic,
                scheduler::spawn_daily_job(bot.clone(), state.clone(), topic),
            );
        }
    }

    info!("dayroll bot running");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
