//! Session identity and the local key-value store backing it.
//!
//! The session identifier is created once per state directory and reused
//! on every start. It is passed explicitly to whatever needs it rather
//! than looked up from ambient state.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

/// Key under which the session identifier is stored.
pub const SESSION_KEY: &str = "userId";

/// File name of the key-value store inside the state directory.
const STORE_FILE: &str = "local_state.json";

/// Error type for local store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small persistent string map, one JSON file per state directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open the store in `state_dir`, creating the directory if needed.
    pub fn open(state_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let state_dir = state_dir.as_ref();
        fs::create_dir_all(state_dir)?;
        Ok(Self {
            path: state_dir.join(STORE_FILE),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a value.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Write a value, replacing any previous one.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;
        atomic_write(&self.path, json.as_bytes())?;
        Ok(())
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

/// Opaque per-profile user identifier sent with every chat request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier of the form `user_<unix-millis>`.
    pub fn generate() -> Self {
        Self(format!("user_{}", Utc::now().timestamp_millis()))
    }

    /// Return the stored identifier, creating and persisting one if absent.
    pub fn load_or_create(store: &LocalStore) -> Result<Self, StoreError> {
        if let Some(existing) = store.get(SESSION_KEY)? {
            if !existing.trim().is_empty() {
                debug!(session_id = %existing, "reusing stored session id");
                return Ok(Self(existing));
            }
        }

        let id = Self::generate();
        store.set(SESSION_KEY, id.as_str())?;
        info!(session_id = %id, "created new session id");
        Ok(id)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace `path` with `content` via a synced sibling temp file, so readers
/// never see a partial store. The temp file is removed if anything fails.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, LocalStore) {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::open(temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn test_open_creates_state_dir() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        let store = LocalStore::open(&nested).unwrap();
        assert!(nested.exists());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_get_set() {
        let (_temp, store) = setup_store();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();
        store.set("other", "value").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let (_temp, store) = setup_store();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.get(SESSION_KEY), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_session_id_created_and_persisted() {
        let (_temp, store) = setup_store();
        let id = SessionId::load_or_create(&store).unwrap();
        assert!(id.as_str().starts_with("user_"));
        assert_eq!(store.get(SESSION_KEY).unwrap().as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_session_id_stable_across_initializations() {
        let (temp, store) = setup_store();
        let first = SessionId::load_or_create(&store).unwrap();

        let reopened = LocalStore::open(temp.path()).unwrap();
        let second = SessionId::load_or_create(&reopened).unwrap();
        let third = SessionId::load_or_create(&reopened).unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn test_session_id_uses_existing_value() {
        let (_temp, store) = setup_store();
        store.set(SESSION_KEY, "user_42").unwrap();
        let id = SessionId::load_or_create(&store).unwrap();
        assert_eq!(id.as_str(), "user_42");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (temp, store) = setup_store();
        store.set("k", "v").unwrap();
        store.set("k", "w").unwrap();
        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![STORE_FILE.to_string()]);
    }
}
