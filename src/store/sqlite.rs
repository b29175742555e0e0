use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::store::DocumentStore;

/// SQLite-backed document store. Documents live in a single table keyed by
/// (collection, id) with the body stored as JSON text.
pub struct SqliteStore {
    pool: SqlitePool,
}

fn current_time_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl SqliteStore {
    /// Build a store over a lazily-connected pool. Connection problems
    /// surface per-operation, not here; callers probe with `ping`.
    pub fn connect(url: &str) -> AppResult<Self> {
        let connect_opts = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::Query(format!("invalid database url {}: {}", url, e)))?
            .create_if_missing(true);

        // In-memory SQLite is per-connection; pin the pool to one live
        // connection so all operations see the same database.
        let pool_opts = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_opts.connect_lazy_with(connect_opts);
        Ok(Self { pool })
    }

    pub async fn in_memory() -> AppResult<Self> {
        let store = Self::connect("sqlite::memory:")?;
        store.init().await?;
        Ok(store)
    }

    /// Create the documents table and its lookup index.
    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Query(format!("Failed to create documents table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Query(format!("Failed to create collection index: {}", e)))?;

        Ok(())
    }

    fn parse_row(data: String) -> AppResult<Value> {
        serde_json::from_str(&data)
            .map_err(|e| AppError::Internal(format!("Corrupt document in store: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, id: &str, doc: &Value) -> AppResult<()> {
        let now = current_time_millis();
        let data = doc.to_string();
        sqlx::query(
            "INSERT INTO documents (collection, id, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Query(format!("Failed to insert into {}: {}", collection, e)))?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::Query(format!("Failed to get {} from {}: {}", id, collection, e))
            })?;

        match row {
            Some(row) => Ok(Some(Self::parse_row(row.get("data"))?)),
            None => Ok(None),
        }
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<Value>> {
        let rows =
            sqlx::query("SELECT data FROM documents WHERE collection = ? ORDER BY created_at")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::Query(format!("Failed to list {}: {}", collection, e)))?;

        rows.into_iter()
            .map(|row| Self::parse_row(row.get("data")))
            .collect()
    }

    async fn merge(&self, collection: &str, id: &str, patch: &Value) -> AppResult<Option<Value>> {
        let Some(mut doc) = self.get(collection, id).await? else {
            return Ok(None);
        };

        if let (Value::Object(target), Value::Object(fields)) = (&mut doc, patch) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }

        let now = current_time_millis();
        let result = sqlx::query(
            "UPDATE documents SET data = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(doc.to_string())
        .bind(now)
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::Query(format!("Failed to update {} in {}: {}", id, collection, e))
        })?;

        if result.rows_affected() == 0 {
            // Deleted between read and write; treat as absent.
            return Ok(None);
        }
        Ok(Some(doc))
    }

    async fn remove(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let Some(doc) = self.get(collection, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Query(format!("Failed to delete {} from {}: {}", id, collection, e))
            })?;

        Ok(Some(doc))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> AppResult<Option<Value>> {
        let row = sqlx::query(
            "SELECT data FROM documents WHERE collection = ? AND json_extract(data, '$.' || ?) = ? LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::Query(format!(
                "Failed to search {} by {}: {}",
                collection, field, e
            ))
        })?;

        match row {
            Some(row) => Ok(Some(Self::parse_row(row.get("data"))?)),
            None => Ok(None),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Query(format!("Database unreachable: {}", e)))?;
        Ok(())
    }
}
