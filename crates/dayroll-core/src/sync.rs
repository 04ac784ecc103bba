//! Pure decisions behind the status-message synchronizer and the
//! daily reset.
//!
//! The gateway only executes what `plan` decides; keeping the decision
//! here lets the send/edit/skip logic and the reset sequence be tested
//! without a live bot connection.

use chrono::NaiveDate;

use crate::constants::HEADER_DATE_FMT;

/// What the synchronizer should do for one (topic, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPlan {
    /// No status message recorded yet: send a fresh one and record it.
    Send,
    /// A message is recorded and the text changed: edit it in place.
    Edit { message_id: i32 },
    /// Recorded text already matches: no platform call at all.
    Skip,
}

/// Decide the next platform action from the recorded message id, the
/// text of the last successful sync and the freshly rendered text.
pub fn plan(recorded: Option<i32>, last_render: Option<&str>, text: &str) -> SyncPlan {
    match (recorded, last_render) {
        (None, _) => SyncPlan::Send,
        (Some(_), Some(last)) if last == text => SyncPlan::Skip,
        (Some(message_id), _) => SyncPlan::Edit { message_id },
    }
}

/// Header announcement posted once per day by the daily reset.
pub fn header_line(date: NaiveDate) -> String {
    format!("Date {}, list for today:", date.format(HEADER_DATE_FMT))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::constants::LIST_HEADER;
    use crate::list;
    use crate::store::StateStore;
    use crate::topic::TopicKey;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    #[test]
    fn first_sync_sends_a_fresh_message() {
        assert_eq!(plan(None, None, "Today's list:\n• milk"), SyncPlan::Send);
    }

    #[test]
    fn unchanged_resync_makes_no_platform_call() {
        let text = "Today's list:\n• milk";
        assert_eq!(plan(Some(7), Some(text), text), SyncPlan::Skip);
        // Stays a skip for as long as nothing changes.
        assert_eq!(plan(Some(7), Some(text), text), SyncPlan::Skip);
    }

    #[test]
    fn changed_text_edits_the_recorded_message() {
        assert_eq!(
            plan(Some(7), Some("Today's list:"), "Today's list:\n• milk"),
            SyncPlan::Edit { message_id: 7 }
        );
    }

    #[test]
    fn lost_cache_with_recorded_id_still_edits() {
        // After a restart the cache is empty but the record survives;
        // one edit re-establishes it.
        assert_eq!(
            plan(Some(7), None, "Today's list:"),
            SyncPlan::Edit { message_id: 7 }
        );
    }

    #[test]
    fn daily_reset_empties_the_list_and_needs_one_edit() {
        let dir = tempdir().unwrap();
        let mut store = StateStore::open(dir.path().join("state.json"));
        let topic = TopicKey::new(-100, Some(3));
        store
            .set_list(topic, date(), vec!["old".into(), "stale".into()])
            .unwrap();
        store.set_status_message(topic, date(), 42).unwrap();

        store.clear_list(topic, date()).unwrap();
        let text = list::render(&store.get_list(topic, date()));
        assert_eq!(text, LIST_HEADER);

        // One edit brings the status message in line with the empty
        // header, after which further syncs are free.
        let stale = list::render(&["old".to_string(), "stale".to_string()]);
        assert_eq!(
            plan(store.get_status_message(topic, date()), Some(stale.as_str()), &text),
            SyncPlan::Edit { message_id: 42 }
        );
        assert_eq!(
            plan(store.get_status_message(topic, date()), Some(text.as_str()), &text),
            SyncPlan::Skip
        );
    }

    #[test]
    fn header_line_uses_day_month_year() {
        assert_eq!(header_line(date()), "Date 27.08.2026, list for today:");
    }
}
