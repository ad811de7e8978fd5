//! Profile of exported event ids.
//!
//! The profile remembers which events were written in earlier runs so they
//! can be skipped. It is stored as a JSON array next to the other user data.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use coca_core::SeenIds;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Ids of events exported in earlier runs, persisted as a JSON array.
#[derive(Debug)]
pub struct ProfileStore {
    ids: Vec<String>,
    index: HashSet<String>,
    path: PathBuf,
}

impl ProfileStore {
    /// Creates an empty store that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            ids: Vec::new(),
            index: HashSet::new(),
            path: path.into(),
        }
    }

    /// Loads the store from disk, falling back to an empty store.
    ///
    /// A missing file is normal on first use. An unreadable or malformed
    /// file is reported and treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(path);
        if !store.path.exists() {
            debug!(path = %store.path.display(), "no profile yet");
            return store;
        }

        let loaded = std::fs::read_to_string(&store.path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Vec<String>>(&content).map_err(|e| e.to_string())
            });
        match loaded {
            Ok(ids) => {
                store.record(ids);
                debug!(path = %store.path.display(), count = store.len(), "loaded profile");
            }
            Err(error) => {
                warn!(path = %store.path.display(), %error, "ignoring unreadable profile");
            }
        }
        store
    }

    /// Persists the store, creating the parent directory if needed.
    pub fn save(&self) -> CliResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.ids)
            .map_err(|e| CliError::Profile(format!("failed to serialize profile: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| CliError::io(&self.path, e))
    }

    /// Returns true if the id was exported before.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Appends ids in order, skipping those already present.
    ///
    /// Returns how many ids were new.
    pub fn record<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.ids.len();
        for id in ids {
            let id = id.into();
            if self.index.insert(id.clone()) {
                self.ids.push(id);
            }
        }
        self.ids.len() - before
    }

    /// Recorded ids, oldest first.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forgets all ids. Call [`save`](Self::save) to persist.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.index.clear();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeenIds for ProfileStore {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::load(dir.path().join("profile.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = ProfileStore::load(&path);
        assert!(store.is_empty());
        assert_eq!(store.path(), path);
    }

    #[test]
    fn record_keeps_order_and_skips_known() {
        let mut store = ProfileStore::empty("/unused/profile.json");
        assert_eq!(store.record(["b", "a", "b"]), 2);
        assert_eq!(store.record(vec!["a".to_string(), "c".to_string()]), 1);
        assert_eq!(store.ids(), ["b", "a", "c"]);
        assert!(store.contains("c"));
        assert!(store.contains_id("a"));
        assert!(!store.contains("d"));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.json");

        let mut store = ProfileStore::load(&path);
        store.record(["evt-1", "evt-2"]);
        store.save().unwrap();

        let reloaded = ProfileStore::load(&path);
        assert_eq!(reloaded.ids(), ["evt-1", "evt-2"]);

        let raw: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, vec!["evt-1", "evt-2"]);
    }

    #[test]
    fn clear_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut store = ProfileStore::empty(&path);
        store.record(["evt-1"]);
        store.save().unwrap();
        store.clear();
        store.save().unwrap();

        assert!(!store.contains("evt-1"));
        assert!(ProfileStore::load(&path).is_empty());
    }
}
