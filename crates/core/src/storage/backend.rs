use crate::errors::CoreError;

/// Raw string key-value storage (the role browser `localStorage` plays).
///
/// Implementations synchronize internally so a store can be shared between
/// the caller and scheduled tasks behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, CoreError>;
}
