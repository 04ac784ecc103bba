//! Durable state record: enabled topics, per-day lists, status-message ids.
//!
//! The store is the sole writer of the on-disk record. Every mutation
//! commits before returning, using write-to-temp + atomic rename so a
//! crash mid-write never leaves a partial file. A missing or unreadable
//! record loads as the empty default: the history of lists and message
//! ids is not safety-critical.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::constants::DATE_KEY_FMT;
use crate::error::StoreError;
use crate::topic::TopicKey;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateRecord {
    #[serde(default)]
    enabled_topics: Vec<TopicKey>,
    /// topic -> date -> ordered items
    #[serde(default)]
    lists: HashMap<TopicKey, BTreeMap<String, Vec<String>>>,
    /// topic -> date -> id of the live status message
    #[serde(default)]
    status_messages: HashMap<TopicKey, BTreeMap<String, i32>>,
}

#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    record: StateRecord,
}

impl StateStore {
    /// Open the store at `path`, loading the existing record if any.
    /// Corrupt content is logged and replaced by the empty default.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let record = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(record) => record,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "state file corrupt, starting empty");
                    StateRecord::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StateRecord::default(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "state file unreadable, starting empty");
                StateRecord::default()
            }
        };
        Self { path, record }
    }

    pub fn get_list(&self, topic: TopicKey, date: NaiveDate) -> Vec<String> {
        self.record
            .lists
            .get(&topic)
            .and_then(|days| days.get(&date_key(date)))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_list(
        &mut self,
        topic: TopicKey,
        date: NaiveDate,
        items: Vec<String>,
    ) -> Result<(), StoreError> {
        self.record
            .lists
            .entry(topic)
            .or_default()
            .insert(date_key(date), items);
        self.save()
    }

    pub fn clear_list(&mut self, topic: TopicKey, date: NaiveDate) -> Result<(), StoreError> {
        self.set_list(topic, date, Vec::new())
    }

    pub fn get_status_message(&self, topic: TopicKey, date: NaiveDate) -> Option<i32> {
        self.record
            .status_messages
            .get(&topic)
            .and_then(|days| days.get(&date_key(date)))
            .copied()
    }

    pub fn set_status_message(
        &mut self,
        topic: TopicKey,
        date: NaiveDate,
        message_id: i32,
    ) -> Result<(), StoreError> {
        self.record
            .status_messages
            .entry(topic)
            .or_default()
            .insert(date_key(date), message_id);
        self.save()
    }

    pub fn is_enabled(&self, topic: TopicKey) -> bool {
        self.record.enabled_topics.contains(&topic)
    }

    /// Idempotent: enabling an enabled topic is a no-op (no disk write).
    pub fn enable(&mut self, topic: TopicKey) -> Result<(), StoreError> {
        if self.record.enabled_topics.contains(&topic) {
            return Ok(());
        }
        self.record.enabled_topics.push(topic);
        self.save()
    }

    /// Idempotent: disabling a disabled topic is a no-op.
    pub fn disable(&mut self, topic: TopicKey) -> Result<(), StoreError> {
        let before = self.record.enabled_topics.len();
        self.record.enabled_topics.retain(|t| *t != topic);
        if self.record.enabled_topics.len() == before {
            return Ok(());
        }
        self.save()
    }

    /// Snapshot of the enabled set, for daily-job restoration at start-up.
    pub fn enabled_topics(&self) -> Vec<TopicKey> {
        self.record.enabled_topics.clone()
    }

    fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.record)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FMT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    fn topic() -> TopicKey {
        TopicKey::new(-1009, Some(12))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state.json"));
        assert!(store.get_list(topic(), date()).is_empty());
        assert_eq!(store.get_status_message(topic(), date()), None);
        assert!(!store.is_enabled(topic()));
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = StateStore::open(&path);
        assert!(store.enabled_topics().is_empty());
    }

    #[test]
    fn record_survives_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let mut store = StateStore::open(&path);
            store.enable(topic()).unwrap();
            store
                .set_list(topic(), date(), vec!["A".into(), "B".into()])
                .unwrap();
            store.set_status_message(topic(), date(), 77).unwrap();
        }
        let store = StateStore::open(&path);
        assert!(store.is_enabled(topic()));
        assert_eq!(store.get_list(topic(), date()), vec!["A", "B"]);
        assert_eq!(store.get_status_message(topic(), date()), Some(77));
    }

    #[test]
    fn enable_disable_are_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = StateStore::open(dir.path().join("state.json"));
        store.enable(topic()).unwrap();
        store.enable(topic()).unwrap();
        assert_eq!(store.enabled_topics().len(), 1);
        store.disable(topic()).unwrap();
        store.disable(topic()).unwrap();
        assert!(store.enabled_topics().is_empty());
    }

    #[test]
    fn clear_replaces_with_empty_list() {
        let dir = tempdir().unwrap();
        let mut store = StateStore::open(dir.path().join("state.json"));
        store.set_list(topic(), date(), vec!["A".into()]).unwrap();
        store.clear_list(topic(), date()).unwrap();
        assert!(store.get_list(topic(), date()).is_empty());
    }

    #[test]
    fn topics_in_one_chat_with_different_threads_are_independent() {
        let dir = tempdir().unwrap();
        let mut store = StateStore::open(dir.path().join("state.json"));
        let a = TopicKey::new(-1009, Some(1));
        let b = TopicKey::new(-1009, Some(2));
        store.set_list(a, date(), vec!["left".into()]).unwrap();
        store.set_list(b, date(), vec!["right".into()]).unwrap();
        store.set_status_message(a, date(), 10).unwrap();
        store.set_status_message(b, date(), 20).unwrap();
        assert_eq!(store.get_list(a, date()), vec!["left"]);
        assert_eq!(store.get_list(b, date()), vec!["right"]);
        assert_eq!(store.get_status_message(a, date()), Some(10));
        assert_eq!(store.get_status_message(b, date()), Some(20));
    }

    #[test]
    fn historical_dates_remain_in_storage() {
        let dir = tempdir().unwrap();
        let mut store = StateStore::open(dir.path().join("state.json"));
        let yesterday = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        store.set_list(topic(), yesterday, vec!["old".into()]).unwrap();
        store.clear_list(topic(), date()).unwrap();
        assert_eq!(store.get_list(topic(), yesterday), vec!["old"]);
    }
}
