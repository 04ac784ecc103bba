use std::sync::Arc;

use anyhow::Result;
use dayroll_core::list::{self, MoveOutcome};
use dayroll_core::{schedule, EditAction, TopicKey, WizardState};
use teloxide::prelude::*;
use tracing::warn;

use crate::keyboard::{self, CANCEL_DATA, DEST_PREFIX, PICK_PREFIX};
use crate::state::AppState;
use crate::display;

/// Route a button press: action choice, index pick or destination pick.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> Result<()> {
    let (Some(data), Some(message)) = (q.data.clone(), q.message.clone()) else {
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let topic = TopicKey::new(message.chat.id.0, message.thread_id);

    if data == CANCEL_DATA {
        state.wizards.lock().await.cancel(topic);
        bot.edit_message_text(message.chat.id, message.id, "Cancelled.")
            .await?;
    } else if let Some(code) = data.strip_prefix("edit:") {
        on_action(&bot, &message, &state, topic, code).await?;
    } else if let Some(index) = keyboard::parse_index(&data, PICK_PREFIX) {
        on_index_pick(&bot, &message, &state, topic, index).await?;
    } else if let Some(dest) = keyboard::parse_index(&data, DEST_PREFIX) {
        on_destination_pick(&bot, &message, &state, topic, dest).await?;
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn on_action(
    bot: &Bot,
    message: &Message,
    state: &Arc<AppState>,
    topic: TopicKey,
    code: &str,
) -> Result<()> {
    let Some(action) = EditAction::from_code(code) else {
        bot.edit_message_text(message.chat.id, message.id, "Unsupported action.")
            .await?;
        return Ok(());
    };
    let date = schedule::today(state.config.timezone);
    let items = state.store.lock().await.get_list(topic, date);
    if action.needs_existing_items() && items.is_empty() {
        bot.edit_message_text(
            message.chat.id,
            message.id,
            "Nothing to edit yet. Use ➕ Insert.",
        )
        .await?;
        return Ok(());
    }

    state.wizards.lock().await.start(topic, action);
    let prompt = match action {
        EditAction::Replace => "Pick the line to replace:",
        EditAction::Delete => "Pick the line to delete:",
        EditAction::Insert => "Pick the position to insert before (the last one appends):",
        EditAction::Move => "Pick the line to move:",
    };
    bot.edit_message_text(message.chat.id, message.id, prompt)
        .reply_markup(keyboard::index_keyboard(
            action.index_choices(items.len()),
            PICK_PREFIX,
        ))
        .await?;
    Ok(())
}

async fn on_index_pick(
    bot: &Bot,
    message: &Message,
    state: &Arc<AppState>,
    topic: TopicKey,
    index: usize,
) -> Result<()> {
    let date = schedule::today(state.config.timezone);
    let session = state.wizards.lock().await.take(topic);
    let Some(WizardState::ChoosingIndex { action }) = session else {
        bot.edit_message_text(
            message.chat.id,
            message.id,
            "No active edit session. Use /edit to start again.",
        )
        .await?;
        return Ok(());
    };

    match action {
        EditAction::Delete => {
            // Commits immediately, no free-text step.
            let result = {
                let mut store = state.store.lock().await;
                let mut items = store.get_list(topic, date);
                match list::delete_at(&mut items, index) {
                    Ok(removed) => {
                        store.set_list(topic, date, items)?;
                        Ok(removed)
                    }
                    Err(err) => Err(err),
                }
            };
            match result {
                Ok(removed) => {
                    if let Err(err) = display::sync(bot, state, topic, date).await {
                        warn!(topic = %topic, error = %err, "status sync failed after delete");
                    }
                    bot.edit_message_text(
                        message.chat.id,
                        message.id,
                        format!("Deleted line {index}: {removed}"),
                    )
                    .await?;
                }
                Err(_) => {
                    bot.edit_message_text(message.chat.id, message.id, "Invalid position.")
                        .await?;
                }
            }
        }
        EditAction::Replace | EditAction::Insert => {
            state
                .wizards
                .lock()
                .await
                .set(topic, WizardState::AwaitingText { action, index });
            let prompt = match action {
                EditAction::Replace => {
                    format!("Send the new text for line {index} as a message.")
                }
                _ => format!("Send the text to insert before position {index} as a message."),
            };
            bot.edit_message_text(message.chat.id, message.id, prompt)
                .await?;
        }
        EditAction::Move => {
            let len = state.store.lock().await.get_list(topic, date).len();
            state
                .wizards
                .lock()
                .await
                .set(topic, WizardState::AwaitingDestination { from: index });
            bot.edit_message_text(message.chat.id, message.id, "Pick the new position:")
                .reply_markup(keyboard::index_keyboard(len, DEST_PREFIX))
                .await?;
        }
    }
    Ok(())
}

async fn on_destination_pick(
    bot: &Bot,
    message: &Message,
    state: &Arc<AppState>,
    topic: TopicKey,
    dest: usize,
) -> Result<()> {
    let date = schedule::today(state.config.timezone);
    let session = state.wizards.lock().await.take(topic);
    let Some(WizardState::AwaitingDestination { from }) = session else {
        // Stale or mismatched session; already reset by take().
        bot.edit_message_text(message.chat.id, message.id, "Invalid positions.")
            .await?;
        return Ok(());
    };

    let outcome = {
        let mut store = state.store.lock().await;
        let mut items = store.get_list(topic, date);
        match list::move_item(&mut items, from, dest) {
            Ok(MoveOutcome::Moved) => {
                store.set_list(topic, date, items)?;
                Ok(MoveOutcome::Moved)
            }
            Ok(MoveOutcome::Unchanged) => Ok(MoveOutcome::Unchanged),
            Err(err) => Err(err),
        }
    };
    match outcome {
        Ok(MoveOutcome::Moved) => {
            if let Err(err) = display::sync(bot, state, topic, date).await {
                warn!(topic = %topic, error = %err, "status sync failed after move");
            }
            bot.edit_message_text(
                message.chat.id,
                message.id,
                format!("Moved line {from} to position {dest}."),
            )
            .await?;
        }
        Ok(MoveOutcome::Unchanged) => {
            bot.edit_message_text(message.chat.id, message.id, "Positions match, nothing moved.")
                .await?;
        }
        Err(_) => {
            bot.edit_message_text(message.chat.id, message.id, "Invalid positions.")
                .await?;
        }
    }
    Ok(())
}
