//! Local persistence mirror
//!
//! Each flat collection (bookmarks, history, downloads, settings) is mirrored
//! under its own key in a durable key-value store. State is hydrated once on
//! start and every mutation overwrites the whole persisted value. Writes are
//! fire-and-forget: failures are logged, never propagated.

mod bookmarks;
mod downloads;
mod history;
mod settings;

pub use bookmarks::{Bookmark, Bookmarks};
pub use downloads::{DownloadItem, DownloadStatus, Downloads};
pub use history::{HistoryGroup, HistoryItem, History, group_by_day};
pub use settings::{FontSize, SearchEngine, Settings, SettingsState};

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::utils::{Result, StorageError};

pub const BOOKMARKS_KEY: &str = "answer-browser-bookmarks";
pub const HISTORY_KEY: &str = "answer-browser-history";
pub const DOWNLOADS_KEY: &str = "answer-browser-downloads";
pub const SETTINGS_KEY: &str = "answer-browser-settings";

/// Version stamped on every persisted value
pub const PERSIST_VERSION: u32 = 0;

/// Durable string key-value store
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    // A writer that panicked mid-insert leaves the map itself intact, so a
    // poisoned lock is recovered rather than treated as empty.
    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Backend {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Backend {
                key: key.to_string(),
                source,
            }
            .into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        // Write-then-rename so a crash never leaves a truncated file behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| {
                StorageError::Backend {
                    key: key.to_string(),
                    source,
                }
                .into()
            })
    }
}

/// On-disk envelope: `{"state": ..., "version": 0}`
#[derive(Debug, Serialize, Deserialize)]
struct Persisted<T> {
    state: T,
    version: u32,
}

/// Typed handle on one key of a [`KeyValueStore`]
pub struct Mirror<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _state: PhantomData<fn() -> T>,
}

impl<T> Mirror<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _state: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load the persisted state, falling back to the default when the key is
    /// missing or unreadable
    pub fn hydrate(&self) -> T {
        match self.try_hydrate() {
            Ok(Some(state)) => state,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Ignoring persisted '{}': {}", self.key, e);
                T::default()
            }
        }
    }

    fn try_hydrate(&self) -> Result<Option<T>> {
        let Some(text) = self.store.load(self.key)? else {
            return Ok(None);
        };
        let persisted: Persisted<T> =
            serde_json::from_str(&text).map_err(|source| StorageError::Serde {
                key: self.key.to_string(),
                source,
            })?;
        Ok(Some(persisted.state))
    }

    /// Overwrite the persisted state; failures are logged
    pub fn write(&self, state: &T) {
        if let Err(e) = self.try_write(state) {
            log::warn!("Failed to persist '{}': {}", self.key, e);
        }
    }

    fn try_write(&self, state: &T) -> Result<()> {
        let text = serde_json::to_string(&Persisted {
            state,
            version: PERSIST_VERSION,
        })
        .map_err(|source| StorageError::Serde {
            key: self.key.to_string(),
            source,
        })?;
        self.store.save(self.key, &text)
    }
}

/// Random record id
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn test_memory_store_survives_poisoned_lock() {
        let store = Arc::new(MemoryStore::new());
        store.save("kept", "before").unwrap();

        let poisoner = Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(store.entries.is_poisoned());

        assert_eq!(store.load("kept").unwrap().as_deref(), Some("before"));
        store.save("kept", "after").unwrap();
        assert_eq!(store.load("kept").unwrap().as_deref(), Some("after"));
    }

    #[test]
    fn test_mirror_round_trips_through_memory_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mirror: Mirror<Counter> = Mirror::new(store.clone(), "counter");

        assert_eq!(mirror.hydrate(), Counter::default());
        mirror.write(&Counter { count: 3 });

        let raw = store.load("counter").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["state"]["count"], 3);
        assert_eq!(json["version"], 0);
        assert_eq!(mirror.hydrate(), Counter { count: 3 });
    }

    #[test]
    fn test_corrupt_value_hydrates_default() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.save("counter", "{not json").unwrap();
        let mirror: Mirror<Counter> = Mirror::new(store, "counter");
        assert_eq!(mirror.hydrate(), Counter::default());
    }

    #[test]
    fn test_file_store_persists_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.load("missing").unwrap(), None);
        store.save("a", "1").unwrap();
        store.save("b", "2").unwrap();
        store.save("a", "3").unwrap();

        let reopened = FileStore::open(store.root()).unwrap();
        assert_eq!(reopened.load("a").unwrap().as_deref(), Some("3"));
        assert_eq!(reopened.load("b").unwrap().as_deref(), Some("2"));
        assert!(dir.path().join("data").join("a.json").exists());
    }
}
