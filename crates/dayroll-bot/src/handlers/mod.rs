mod callback;
mod capture;
mod command;

use std::sync::Arc;

use anyhow::Result;
use dayroll_core::TopicKey;
use teloxide::prelude::*;

use crate::state::AppState;

pub use callback::handle_callback;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(text) = msg.text().map(|t| t.to_string()) else {
        return Ok(());
    };
    let topic = TopicKey::new(msg.chat.id.0, msg.thread_id);

    if let Some(cmd) = command::parse_command(&text) {
        let cmd = cmd.to_string();
        return command::dispatch(bot, msg, state, topic, &cmd).await;
    }

    capture::capture_text(bot, msg, state, topic, text).await
}
