//! Display synchronizer: keeps at most one status message per topic per
//! day mirroring the current list, plus ephemeral acknowledgement
//! notices that clean themselves up.

use std::time::Duration;

use chrono::NaiveDate;
use dayroll_core::sync::{plan, SyncPlan};
use dayroll_core::{list, TopicKey};
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::RequestError;
use tracing::debug;

use crate::state::AppState;

/// Send `text` into the topic's thread (or the default thread).
pub async fn send_in_topic(
    bot: &Bot,
    topic: TopicKey,
    text: &str,
) -> Result<Message, RequestError> {
    let mut request = bot.send_message(ChatId(topic.chat_id), text);
    if let Some(thread) = topic.thread() {
        request = request.message_thread_id(thread);
    }
    request.await
}

/// Bring the topic's status message for `date` in line with the current
/// list.
///
/// No recorded message: send one and record its id. Recorded and text
/// unchanged since the last successful sync: no platform call. Otherwise
/// edit in place; if the edit fails for any reason a fresh message is
/// sent and recorded, and the orphaned old one is left alone.
pub async fn sync(
    bot: &Bot,
    state: &AppState,
    topic: TopicKey,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let (text, recorded) = {
        let store = state.store.lock().await;
        (
            list::render(&store.get_list(topic, date)),
            store.get_status_message(topic, date),
        )
    };

    let decision = {
        let cache = state.last_render.lock().await;
        plan(recorded, cache.get(&(topic, date)).map(String::as_str), &text)
    };
    match decision {
        SyncPlan::Skip => return Ok(()),
        SyncPlan::Edit { message_id } => {
            match bot
                .edit_message_text(ChatId(topic.chat_id), MessageId(message_id), text.as_str())
                .await
            {
                Ok(_) => {
                    state.last_render.lock().await.insert((topic, date), text);
                    return Ok(());
                }
                Err(err) => {
                    debug!(topic = %topic, error = %err, "edit failed, sending a fresh status message");
                }
            }
        }
        SyncPlan::Send => {}
    }

    let sent = send_in_topic(bot, topic, &text).await?;
    state
        .store
        .lock()
        .await
        .set_status_message(topic, date, sent.id.0)?;
    state.last_render.lock().await.insert((topic, date), text);
    Ok(())
}

/// Post a short-lived acknowledgement and schedule its deletion. Both
/// the send and the delayed delete are best-effort.
pub async fn send_ephemeral(bot: &Bot, topic: TopicKey, text: &str, ttl_secs: u64) {
    match send_in_topic(bot, topic, text).await {
        Ok(sent) => {
            let bot = bot.clone();
            let chat_id = ChatId(topic.chat_id);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(ttl_secs)).await;
                let _ = bot.delete_message(chat_id, sent.id).await;
            });
        }
        Err(err) => {
            debug!(topic = %topic, error = %err, "failed to send acknowledgement");
        }
    }
}
