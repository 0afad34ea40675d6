use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::CoreError;

use super::backend::KeyValueStore;
use super::keys;
use super::memory::MemoryStore;

/// JSON read/write helpers over a shared [`KeyValueStore`].
///
/// Cheap to clone: every clone talks to the same backend.
#[derive(Clone)]
pub struct LocalStorage {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage").finish_non_exhaustive()
    }
}

impl LocalStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Storage backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// Deserialized value under `key`, or `None` if the key is missing or empty.
    pub fn try_read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.backend.get(key)? {
            Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Deserialized value under `key`, or `fallback`.
    ///
    /// Missing keys, unparsable JSON and backend read failures all yield the
    /// fallback. Corruption is logged, never returned.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e @ CoreError::Deserialization(_)) => {
                warn!(key, error = %e, "corrupt value in storage, using fallback");
                fallback
            }
            Err(e) => {
                warn!(key, error = %e, "storage read failed, using fallback");
                fallback
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        debug!(key, bytes = json.len(), "storage write");
        self.backend.set(key, &json)
    }

    pub fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.backend.remove(key)
    }

    /// Delete every key under the `sb:` namespace. Returns how many were removed.
    pub fn clear_namespace(&self) -> Result<usize, CoreError> {
        let mut removed = 0;
        for key in self.backend.keys()? {
            if key.starts_with(keys::NAMESPACE) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}
