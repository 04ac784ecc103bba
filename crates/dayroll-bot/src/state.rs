use std::collections::HashMap;

use chrono::NaiveDate;
use dayroll_core::constants::WIZARD_TTL_SECS;
use dayroll_core::{CoreConfig, StateStore, TopicKey, WizardTable};
use tokio::sync::Mutex;

use crate::scheduler::JobRegistry;

/// Shared application state behind an `Arc`.
///
/// All store read-modify-write sequences go through the single store
/// mutex, which serializes appends, wizard commits and daily resets
/// against each other. Wizard sessions and the last-render cache are
/// memory-only and lost on restart.
pub struct AppState {
    pub config: CoreConfig,
    pub store: Mutex<StateStore>,
    pub wizards: Mutex<WizardTable>,
    pub jobs: Mutex<JobRegistry>,
    /// Text of the last successful sync per (topic, date); lets a
    /// no-change sync skip the platform call entirely.
    pub last_render: Mutex<HashMap<(TopicKey, NaiveDate), String>>,
}

impl AppState {
    pub fn new(config: CoreConfig, store: StateStore) -> Self {
        Self {
            config,
            store: Mutex::new(store),
            wizards: Mutex::new(WizardTable::new(WIZARD_TTL_SECS)),
            jobs: Mutex::new(JobRegistry::new()),
            last_render: Mutex::new(HashMap::new()),
        }
    }

    /// Drop render-cache entries for the topic's other dates. Only the
    /// live day is ever displayed, so past entries are dead weight.
    pub async fn prune_render_cache(&self, topic: TopicKey, keep: NaiveDate) {
        self.last_render
            .lock()
            .await
            .retain(|&(t, d), _| t != topic || d == keep);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dayroll_core::{CoreConfig, StateStore, TopicKey};
    use tempfile::tempdir;

    use super::AppState;

    fn state(dir: &std::path::Path) -> AppState {
        let config = CoreConfig {
            token: "123:abc".into(),
            data_dir: dir.to_path_buf(),
            daily_hour: 10,
            timezone: "Europe/Sofia".parse().unwrap(),
        };
        AppState::new(config, StateStore::open(dir.join("state.json")))
    }

    #[tokio::test]
    async fn pruning_keeps_only_the_live_day_per_topic() {
        let dir = tempdir().unwrap();
        let state = state(dir.path());
        let topic = TopicKey::new(-100, Some(3));
        let other = TopicKey::new(-100, Some(4));
        let yesterday = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        {
            let mut cache = state.last_render.lock().await;
            cache.insert((topic, yesterday), "old".into());
            cache.insert((topic, today), "new".into());
            cache.insert((other, yesterday), "untouched".into());
        }

        state.prune_render_cache(topic, today).await;

        let cache = state.last_render.lock().await;
        assert!(!cache.contains_key(&(topic, yesterday)));
        assert!(cache.contains_key(&(topic, today)));
        assert!(cache.contains_key(&(other, yesterday)));
    }
}
