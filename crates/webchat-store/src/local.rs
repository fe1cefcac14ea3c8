use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::{Result, StoreError};

/// Client-local persistent key-value storage (the localStorage role)
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed local store: one file per key under the app state directory
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    /// Open the default store under ~/.webchat/state
    ///
    /// Fails when no home directory is available (the non-interactive
    /// execution context); callers gate the chat view on this succeeding.
    pub fn open_default() -> Result<Self> {
        let dir = webchat_logging::get_webchat_dir()
            .map_err(|e| StoreError::LocalUnavailable(e.to_string()))?
            .join("state");
        Self::open(dir)
    }

    pub fn open(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys contain session UUIDs and underscores only, but be safe
        let safe: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(safe)
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory local store for tests
#[derive(Default)]
pub struct MemoryLocalStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_values() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::open(dir.path().to_path_buf()).unwrap();

        assert_eq!(store.get("session_id").unwrap(), None);
        store.set("session_id", "abc-123").unwrap();
        assert_eq!(store.get("session_id").unwrap(), Some("abc-123".to_string()));

        store.remove("session_id").unwrap();
        assert_eq!(store.get("session_id").unwrap(), None);
    }

    #[test]
    fn file_store_remove_of_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::open(dir.path().to_path_buf()).unwrap();
        store.remove("never_set").unwrap();
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryLocalStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
