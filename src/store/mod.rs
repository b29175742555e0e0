// Document store abstraction. The store is the sole source of truth;
// entities are JSON documents grouped into named collections.

pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;

pub use sqlite::SqliteStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. Fails if (collection, id) already exists.
    async fn insert(&self, collection: &str, id: &str, doc: &Value) -> AppResult<()>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    async fn list(&self, collection: &str) -> AppResult<Vec<Value>>;

    /// Merge the given top-level fields into an existing document and
    /// return the updated document, or None if the id is absent.
    /// Fields not present in `patch` are left untouched.
    async fn merge(&self, collection: &str, id: &str, patch: &Value) -> AppResult<Option<Value>>;

    /// Remove a document, returning it if it existed.
    async fn remove(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// First document whose top-level string field equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Option<Value>>;

    /// Connectivity probe used at startup and by the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}
