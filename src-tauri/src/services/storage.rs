use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tauri::Runtime;
use tauri_plugin_store::Store;

pub const FEEDBACK_OPTIONS_KEY: &str = "feedbackOptions";
pub const CUSTOM_PROMPT_KEY: &str = "customPrompt";
pub const STUDENTS_KEY: &str = "students";

#[derive(Debug)]
pub enum StoreError {
    LockError(String),
    PersistError(String),
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockError(msg) => write!(f, "Store lock error: {}", msg),
            StoreError::PersistError(msg) => write!(f, "Store persist error: {}", msg),
            StoreError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}

impl From<tauri_plugin_store::Error> for StoreError {
    fn from(err: tauri_plugin_store::Error) -> Self {
        StoreError::PersistError(err.to_string())
    }
}

/// Held across a read-modify-write so no other mutation interleaves with it.
pub type WriteGuard<'a> = MutexGuard<'a, ()>;

/// String key-value storage backing every service. Writes are last-write-wins per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;

    /// One lock per store, shared by every service holding it. Not reentrant.
    fn write_lock(&self) -> Result<WriteGuard<'_>, StoreError>;
}

/// Reads `key` and decodes it as JSON. Undecodable content is logged and treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring undecodable stored value");
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<()>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockError("Failed to acquire mutex lock".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockError("Failed to acquire mutex lock".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::LockError("Failed to acquire mutex lock".to_string()))?;
        entries.clear();
        Ok(())
    }

    fn write_lock(&self) -> Result<WriteGuard<'_>, StoreError> {
        self.writes
            .lock()
            .map_err(|_| StoreError::LockError("Failed to acquire write lock".to_string()))
    }
}

/// Adapter over the store plugin's JSON file. Every write is flushed to disk immediately.
pub struct PluginStore<R: Runtime> {
    store: Arc<Store<R>>,
    writes: Mutex<()>,
}

impl<R: Runtime> PluginStore<R> {
    pub fn new(store: Arc<Store<R>>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }
}

impl<R: Runtime> KeyValueStore for PluginStore<R> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.store.get(key).map(|value| match value {
            JsonValue::String(raw) => raw,
            other => other.to_string(),
        });
        Ok(value)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.store.set(key, JsonValue::String(value));
        self.store.save()?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.store.clear();
        self.store.save()?;
        Ok(())
    }

    fn write_lock(&self) -> Result<WriteGuard<'_>, StoreError> {
        self.writes
            .lock()
            .map_err(|_| StoreError::LockError("Failed to acquire write lock".to_string()))
    }
}
