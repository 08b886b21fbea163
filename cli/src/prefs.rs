//! File-backed preference store
//!
//! Durable key/value storage at `~/.rampart/prefs.toml` backing the
//! library's `PreferenceStore` capability. Loaded once at construction;
//! every write is flushed through to disk. Write failures are logged and
//! swallowed, matching the always-succeeds storage contract.

use parking_lot::Mutex;
use rampart_triage::PreferenceStore;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub struct FilePreferences {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FilePreferences {
    pub fn open_default() -> anyhow::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot find home directory"))?;
        Ok(Self::open(home.join(".rampart").join("prefs.toml")))
    }

    pub fn open(path: PathBuf) -> Self {
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let content = match toml::to_string_pretty(entries) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize preferences");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "failed to create preference directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, content) {
            tracing::warn!(error = %e, path = %self.path.display(), "failed to persist preferences");
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let prefs = FilePreferences::open(path.clone());
        prefs.set("hideResolvedAlertItems", "true");
        drop(prefs);

        let reopened = FilePreferences::open(path);
        assert!(reopened.get_bool("hideResolvedAlertItems"));
        assert!(!reopened.get_bool("hideDismissAlertItems"));
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::open(dir.path().join("absent.toml"));
        assert!(prefs.get("anything").is_none());
    }
}
