use std::sync::Arc;

use anyhow::Result;
use dayroll_core::{schedule, TopicKey};
use teloxide::prelude::*;
use tracing::warn;

use crate::state::AppState;
use crate::{display, keyboard, scheduler};

/// Extract the command name from `/cmd@botname args`, if any.
pub fn parse_command(text: &str) -> Option<&str> {
    let rest = text.trim().strip_prefix('/')?;
    let cmd = rest.split_whitespace().next()?;
    let cmd = cmd.split('@').next().unwrap_or(cmd);
    (!cmd.is_empty()).then_some(cmd)
}

pub async fn dispatch(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    topic: TopicKey,
    cmd: &str,
) -> Result<()> {
    match cmd {
        "start" | "help" => {
            let help = format!(
                "This bot keeps one daily list per topic.\n\
                 Run /enable in every topic that needs its own list; it gets a \
                 dated header every day at {:02}:00 ({}).\n\n\
                 Commands in the current topic:\n\
                 /enable - daily header and list for this thread\n\
                 /disable - stop the daily header for this thread\n\
                 /show - show today's list\n\
                 /clear - clear today's list\n\
                 /edit - guided editing (Replace / Delete / Insert / Move)\n\
                 Any other text becomes a list item: the message is deleted and \
                 the list message updated in place.",
                state.config.daily_hour, state.config.timezone
            );
            let _ = display::send_in_topic(&bot, topic, &help).await;
        }
        "enable" => {
            state.store.lock().await.enable(topic)?;
            let handle = scheduler::spawn_daily_job(bot.clone(), state.clone(), topic);
            state.jobs.lock().await.install(topic, handle);
            let date = schedule::today(state.config.timezone);
            if let Err(err) = display::sync(&bot, &state, topic, date).await {
                warn!(topic = %topic, error = %err, "status sync failed after enable");
            }
            let notice = format!(
                "Done. This topic now has its own list and a daily header at {:02}:00.",
                state.config.daily_hour
            );
            let _ = display::send_in_topic(&bot, topic, &notice).await;
        }
        "disable" => {
            state.store.lock().await.disable(topic)?;
            state.jobs.lock().await.cancel(topic);
            let _ =
                display::send_in_topic(&bot, topic, "Daily header disabled for this topic.").await;
        }
        "show" => {
            let date = schedule::today(state.config.timezone);
            if let Err(err) = display::sync(&bot, &state, topic, date).await {
                warn!(topic = %topic, error = %err, "status sync failed on /show");
            }
        }
        "clear" => {
            let date = schedule::today(state.config.timezone);
            state.store.lock().await.clear_list(topic, date)?;
            if let Err(err) = display::sync(&bot, &state, topic, date).await {
                warn!(topic = %topic, error = %err, "status sync failed after clear");
            }
        }
        "edit" => {
            let mut request = bot
                .send_message(
                    msg.chat.id,
                    "What do you want to change? Pick an action:",
                )
                .reply_markup(keyboard::action_keyboard());
            if let Some(thread) = topic.thread() {
                request = request.message_thread_id(thread);
            }
            request.await?;
        }
        _ => {
            // Unknown command: ignore rather than capture as an item.
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_command;

    #[test]
    fn parses_plain_and_addressed_commands() {
        assert_eq!(parse_command("/enable"), Some("enable"));
        assert_eq!(parse_command("/enable@dayroll_bot"), Some("enable"));
        assert_eq!(parse_command("/edit now please"), Some("edit"));
        assert_eq!(parse_command("  /show  "), Some("show"));
    }

    #[test]
    fn non_commands_are_none() {
        assert_eq!(parse_command("milk"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/ show"), None);
    }
}
