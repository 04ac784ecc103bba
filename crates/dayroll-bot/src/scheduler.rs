//! Per-topic daily jobs.
//!
//! Each enabled topic gets one long-lived tokio task that sleeps until
//! the next occurrence of the configured hour in the reference zone,
//! then clears the day's list, posts the dated header and syncs the
//! (now empty) status message. Installing a job for a topic replaces
//! any existing one, so re-enabling never duplicates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dayroll_core::{schedule, sync, TopicKey};
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::display;
use crate::state::AppState;

#[derive(Default)]
pub struct JobRegistry {
    daily: HashMap<TopicKey, JoinHandle<()>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self, topic: TopicKey, handle: JoinHandle<()>) {
        if let Some(old) = self.daily.insert(topic, handle) {
            old.abort();
        }
    }

    pub fn cancel(&mut self, topic: TopicKey) {
        if let Some(handle) = self.daily.remove(&topic) {
            handle.abort();
        }
    }
}

pub fn spawn_daily_job(bot: Bot, state: Arc<AppState>, topic: TopicKey) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let fire = schedule::next_occurrence(now, state.config.daily_hour, state.config.timezone);
            let wait = (fire - now).to_std().unwrap_or_default();
            info!(topic = %topic, fire = %fire, "daily job scheduled");
            tokio::time::sleep(wait).await;
            if let Err(err) = run_daily_reset(&bot, &state, topic).await {
                warn!(topic = %topic, error = %err, "daily reset failed");
            }
        }
    })
}

/// Fresh start for the day: empty list, dated header, empty status
/// message. Best-effort; a failed day does not stop the job.
pub async fn run_daily_reset(
    bot: &Bot,
    state: &Arc<AppState>,
    topic: TopicKey,
) -> anyhow::Result<()> {
    let date = schedule::today(state.config.timezone);
    state.store.lock().await.clear_list(topic, date)?;
    state.prune_render_cache(topic, date).await;
    let header = sync::header_line(date);
    display::send_in_topic(bot, topic, &header).await?;
    display::sync(bot, state, topic, date).await?;
    Ok(())
}
