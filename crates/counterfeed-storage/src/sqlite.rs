//! SQLite checkpoint backend.
//!
//! Persists the relay checkpoint to a single SQLite file. Uses `sqlx` with
//! WAL mode; `save` is an upsert keyed by chain + relay id.
//!
//! # Usage
//! ```rust,no_run
//! use counterfeed_storage::sqlite::SqliteCheckpointStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // File-backed (persistent)
//! let store = SqliteCheckpointStore::open("./relay.db").await?;
//!
//! // In-memory (tests / ephemeral)
//! let store = SqliteCheckpointStore::in_memory().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use counterfeed_core::checkpoint::{Checkpoint, CheckpointStore};
use counterfeed_core::error::RelayError;

/// SQLite-backed checkpoint store.
pub struct SqliteCheckpointStore {
    pool: SqlitePool,
}

impl SqliteCheckpointStore {
    /// Open (or create) a SQLite database at `path`.
    ///
    /// The path may be a plain file path (`"./relay.db"`) or a full SQLite
    /// URL (`"sqlite:./relay.db?mode=rwc"`).
    pub async fn open(path: &str) -> Result<Self, RelayError> {
        let url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{path}?mode=rwc")
        };

        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Open an in-memory SQLite database.
    ///
    /// All data is lost when the pool is dropped. Ideal for tests.
    pub async fn in_memory() -> Result<Self, RelayError> {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the checkpoint table and enable WAL mode.
    async fn init_schema(&self) -> Result<(), RelayError> {
        sqlx::query("PRAGMA journal_mode=WAL;")
            .execute(&self.pool)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS checkpoints (
                chain_id   TEXT    NOT NULL,
                relay_id   TEXT    NOT NULL,
                position   INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (chain_id, relay_id)
            );",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl CheckpointStore for SqliteCheckpointStore {
    async fn load(
        &self,
        chain_id: &str,
        relay_id: &str,
    ) -> Result<Option<Checkpoint>, RelayError> {
        let row = sqlx::query(
            "SELECT chain_id, relay_id, position, updated_at
             FROM checkpoints WHERE chain_id = ? AND relay_id = ?",
        )
        .bind(chain_id)
        .bind(relay_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(row.map(|r| Checkpoint {
            chain_id: r.get("chain_id"),
            relay_id: r.get("relay_id"),
            position: r.get::<i64, _>("position") as u64,
            updated_at: r.get("updated_at"),
        }))
    }

    async fn save(&self, checkpoint: Checkpoint) -> Result<(), RelayError> {
        sqlx::query(
            "INSERT OR REPLACE INTO checkpoints
             (chain_id, relay_id, position, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&checkpoint.chain_id)
        .bind(&checkpoint.relay_id)
        .bind(checkpoint.position as i64)
        .bind(checkpoint.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RelayError::Storage(e.to_string()))?;

        debug!(
            chain_id = %checkpoint.chain_id,
            relay_id = %checkpoint.relay_id,
            position = checkpoint.position,
            "checkpoint saved"
        );
        Ok(())
    }

    async fn delete(&self, chain_id: &str, relay_id: &str) -> Result<(), RelayError> {
        sqlx::query("DELETE FROM checkpoints WHERE chain_id = ? AND relay_id = ?")
            .bind(chain_id)
            .bind(relay_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RelayError::Storage(e.to_string()))?;

        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(position: u64) -> Checkpoint {
        Checkpoint {
            chain_id: "aptos-devnet".into(),
            relay_id: "counter-relay".into(),
            position,
            updated_at: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn checkpoint_roundtrip() {
        let store = SqliteCheckpointStore::in_memory().await.unwrap();

        store.save(checkpoint(986_962)).await.unwrap();

        let loaded = store
            .load("aptos-devnet", "counter-relay")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.position, 986_962);
        assert_eq!(loaded.updated_at, 1_700_000_000);
    }

    #[tokio::test]
    async fn checkpoint_upsert() {
        let store = SqliteCheckpointStore::in_memory().await.unwrap();

        store.save(checkpoint(100)).await.unwrap();
        store.save(checkpoint(200)).await.unwrap();

        // Only one row; second save overwrites the first
        let loaded = store
            .load("aptos-devnet", "counter-relay")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.position, 200);
    }

    #[tokio::test]
    async fn checkpoint_missing_returns_none() {
        let store = SqliteCheckpointStore::in_memory().await.unwrap();
        let result = store.load("unknown-chain", "unknown-relay").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn checkpoint_delete() {
        let store = SqliteCheckpointStore::in_memory().await.unwrap();

        store.save(checkpoint(500)).await.unwrap();
        assert!(store.load("aptos-devnet", "counter-relay").await.unwrap().is_some());

        store.delete("aptos-devnet", "counter-relay").await.unwrap();
        assert!(store.load("aptos-devnet", "counter-relay").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn relays_are_isolated_by_key() {
        let store = SqliteCheckpointStore::in_memory().await.unwrap();

        let mut other = checkpoint(7);
        other.relay_id = "other-relay".into();
        store.save(checkpoint(986_962)).await.unwrap();
        store.save(other).await.unwrap();

        assert_eq!(
            store.load("aptos-devnet", "counter-relay").await.unwrap().unwrap().position,
            986_962
        );
        assert_eq!(
            store.load("aptos-devnet", "other-relay").await.unwrap().unwrap().position,
            7
        );
    }
}
