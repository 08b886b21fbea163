//! Preference storage capability
//!
//! Durable string key/value storage surviving console restarts. The core
//! only ever sees this trait; the console injects a file-backed store and
//! tests inject [`MemoryPreferences`]. Reads and writes are treated as
//! always succeeding; an implementation that can fail should log and
//! swallow.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Most-recent-first query history, capped at [`RECENT_SEARCH_LIMIT`].
pub const RECENT_SEARCHES_KEY: &str = "recentAlertSearches";
pub const RECENT_SEARCH_LIMIT: usize = 10;

/// String key/value store for persisted console preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);

    /// Boolean read: the literal string `"true"` is the only true sentinel;
    /// any other value, including absent, reads as false.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
}

/// Records `query` at the head of the recent-search history, deduplicating
/// and trimming to the cap. `*` (match-everything) is not worth recording.
pub fn record_recent_search(store: &dyn PreferenceStore, query: &str) {
    let query = query.trim();
    if query.is_empty() || query == "*" {
        return;
    }
    let mut recents = recent_searches(store);
    recents.retain(|q| q != query);
    recents.insert(0, query.to_string());
    recents.truncate(RECENT_SEARCH_LIMIT);
    match serde_json::to_string(&recents) {
        Ok(json) => store.set(RECENT_SEARCHES_KEY, &json),
        Err(e) => tracing::warn!(error = %e, "failed to serialize recent searches"),
    }
}

/// The stored history, most recent first. Unparseable history reads as empty.
pub fn recent_searches(store: &dyn PreferenceStore) -> Vec<String> {
    store
        .get(RECENT_SEARCHES_KEY)
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}
