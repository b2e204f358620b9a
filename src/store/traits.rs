//! `KeyValueStore` trait — the persistence capability handed to controllers.

use async_trait::async_trait;

use crate::error::StoreError;

/// String-keyed store of JSON-string values, carried across steps of the
/// flow.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
