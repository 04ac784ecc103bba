use std::sync::Arc;

use anyhow::Result;
use dayroll_core::constants::{APPEND_ACK_TTL_SECS, EDIT_ACK_TTL_SECS};
use dayroll_core::{list, schedule, EditAction, TopicKey};
use teloxide::prelude::*;
use tracing::warn;

use crate::display;
use crate::state::AppState;

/// Plain-text capture for an enabled topic: either the payload of a
/// wizard awaiting text, or a new item appended to today's list. The
/// triggering message is deleted either way; text in a disabled topic
/// is ignored entirely.
pub async fn capture_text(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    topic: TopicKey,
    text: String,
) -> Result<()> {
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() {
        return Ok(());
    }
    if !state.store.lock().await.is_enabled(topic) {
        return Ok(());
    }
    let date = schedule::today(state.config.timezone);

    let pending = state.wizards.lock().await.take_awaiting_text(topic);
    if let Some((action, index)) = pending {
        let _ = bot.delete_message(msg.chat.id, msg.id).await;
        // Bounds are re-checked against the *current* list; it may have
        // changed since the index was picked.
        let committed = {
            let mut store = state.store.lock().await;
            let mut items = store.get_list(topic, date);
            let result = match action {
                EditAction::Replace => list::replace_at(&mut items, index, trimmed.clone()),
                EditAction::Insert => list::insert_before(&mut items, index, trimmed.clone()),
                EditAction::Delete | EditAction::Move => return Ok(()),
            };
            match result {
                Ok(()) => {
                    store.set_list(topic, date, items)?;
                    true
                }
                Err(_) => false,
            }
        };
        if committed {
            if let Err(err) = display::sync(&bot, &state, topic, date).await {
                warn!(topic = %topic, error = %err, "status sync failed after edit");
            }
            let notice = match action {
                EditAction::Replace => format!("Line {index} updated."),
                _ => format!("Inserted before position {index}."),
            };
            display::send_ephemeral(&bot, topic, &notice, EDIT_ACK_TTL_SECS).await;
        } else {
            let _ = display::send_in_topic(&bot, topic, "Invalid position for editing.").await;
        }
        return Ok(());
    }

    // Ordinary append.
    let _ = bot.delete_message(msg.chat.id, msg.id).await;
    {
        let mut store = state.store.lock().await;
        let mut items = store.get_list(topic, date);
        if list::append(&mut items, &trimmed) {
            store.set_list(topic, date, items)?;
        }
    }
    if let Err(err) = display::sync(&bot, &state, topic, date).await {
        warn!(topic = %topic, error = %err, "status sync failed after append");
    }
    display::send_ephemeral(&bot, topic, "List updated.", APPEND_ACK_TTL_SECS).await;
    Ok(())
}
