//! Pure operations on a day's ordered item list.
//!
//! All positions are 1-based, matching what users see in the rendered
//! message and on the index keyboards. Every failing operation leaves
//! the list unchanged.

use crate::constants::{BULLET, LIST_HEADER};
use crate::error::ListError;

/// Result of a move request; moving a line onto itself is reported,
/// not treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Unchanged,
}

/// Append a trimmed item at the end. Fully-blank input is ignored.
/// Returns whether the list changed. Duplicates are allowed.
pub fn append(items: &mut Vec<String>, text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    items.push(trimmed.to_string());
    true
}

/// Replace the item at `index` (1..=len).
pub fn replace_at(items: &mut [String], index: usize, text: String) -> Result<(), ListError> {
    check_bounds(index, items.len())?;
    items[index - 1] = text;
    Ok(())
}

/// Insert `text` before position `index` (1..=len+1); the end position
/// means "append".
pub fn insert_before(items: &mut Vec<String>, index: usize, text: String) -> Result<(), ListError> {
    if index == 0 || index > items.len() + 1 {
        return Err(ListError::InvalidPosition {
            index,
            len: items.len(),
        });
    }
    items.insert(index - 1, text);
    Ok(())
}

/// Remove the item at `index` (1..=len), returning it for user feedback.
pub fn delete_at(items: &mut Vec<String>, index: usize) -> Result<String, ListError> {
    check_bounds(index, items.len())?;
    Ok(items.remove(index - 1))
}

/// Move the item at `from` so that it ends up at position `to`. Both
/// must be within 1..=len.
pub fn move_item(items: &mut Vec<String>, from: usize, to: usize) -> Result<MoveOutcome, ListError> {
    check_bounds(from, items.len())?;
    check_bounds(to, items.len())?;
    if from == to {
        return Ok(MoveOutcome::Unchanged);
    }
    let item = items.remove(from - 1);
    items.insert(to - 1, item);
    Ok(MoveOutcome::Moved)
}

/// Render the canonical display text: the fixed header, then one bullet
/// per item. This is re-derived on every sync, never hand-edited.
pub fn render(items: &[String]) -> String {
    if items.is_empty() {
        return LIST_HEADER.to_string();
    }
    let mut out = String::from(LIST_HEADER);
    for item in items {
        out.push('\n');
        out.push_str(BULLET);
        out.push_str(item);
    }
    out
}

fn check_bounds(index: usize, len: usize) -> Result<(), ListError> {
    if index == 0 || index > len {
        return Err(ListError::InvalidPosition { index, len });
    }
    Ok(())
}
