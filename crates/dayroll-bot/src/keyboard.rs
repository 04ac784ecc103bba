//! Inline keyboards and callback payload encoding.
//!
//! Payload scheme: `edit:<action-code>` and `edit:cancel` from the
//! action menu, `pick:<n>` for the first index choice, `dest:<n>` for a
//! move destination.

use dayroll_core::EditAction;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

const ROW_WIDTH: usize = 5;

pub const PICK_PREFIX: &str = "pick";
pub const DEST_PREFIX: &str = "dest";
pub const CANCEL_DATA: &str = "edit:cancel";

/// Four edit actions plus cancel.
pub fn action_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            action_button("✏️ Replace", EditAction::Replace),
            action_button("🗑 Delete", EditAction::Delete),
        ],
        vec![
            action_button("➕ Insert", EditAction::Insert),
            action_button("↕️ Move", EditAction::Move),
        ],
        vec![InlineKeyboardButton::callback("✖ Cancel", CANCEL_DATA)],
    ])
}

/// Buttons 1..=choices, five per row, with a trailing cancel row.
pub fn index_keyboard(choices: usize, prefix: &str) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    let mut row = Vec::new();
    for i in 1..=choices {
        row.push(InlineKeyboardButton::callback(
            i.to_string(),
            format!("{prefix}:{i}"),
        ));
        if row.len() == ROW_WIDTH {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows.push(vec![InlineKeyboardButton::callback("Cancel", CANCEL_DATA)]);
    InlineKeyboardMarkup::new(rows)
}

/// Extract the 1-based index from a `<prefix>:<n>` payload.
pub fn parse_index(data: &str, prefix: &str) -> Option<usize> {
    data.strip_prefix(prefix)?.strip_prefix(':')?.parse().ok()
}

fn action_button(label: &str, action: EditAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, format!("edit:{}", action.code()))
}
