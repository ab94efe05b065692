//! Checkpoint manager — persists the relay's position for crash recovery.
//!
//! A checkpoint stores the last successfully forwarded transaction position.
//! On restart, the relay resumes from `checkpoint + 1` rather than replaying
//! the whole stream. The checkpoint must never advance past a position whose
//! events were not yet confirmed forwarded; replaying the last batch after a
//! crash produces only already-seen duplicates, which the feed absorbs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::types::ChainPosition;

/// A persisted checkpoint for a relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Chain slug (e.g. `"aptos-devnet"`).
    pub chain_id: String,
    /// Unique relay identifier.
    pub relay_id: String,
    /// Last successfully forwarded transaction position.
    pub position: ChainPosition,
    /// Unix timestamp of when this checkpoint was saved.
    pub updated_at: i64,
}

/// Trait for storing and loading checkpoints.
///
/// Implementations include [`MemoryCheckpointStore`] and the SQLite store
/// in `counterfeed-storage`. The store need not enforce monotonicity; the
/// relay never saves a decreasing position.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the latest checkpoint for a chain + relay pair.
    async fn load(
        &self,
        chain_id: &str,
        relay_id: &str,
    ) -> Result<Option<Checkpoint>, RelayError>;

    /// Save (upsert) a checkpoint.
    async fn save(&self, checkpoint: Checkpoint) -> Result<(), RelayError>;

    /// Delete a checkpoint (e.g. when resetting a relay).
    async fn delete(&self, chain_id: &str, relay_id: &str) -> Result<(), RelayError>;
}

/// Manages checkpoint reads/writes for one relay.
pub struct CheckpointManager {
    store: Box<dyn CheckpointStore>,
    chain_id: String,
    relay_id: String,
}

impl CheckpointManager {
    pub fn new(
        store: Box<dyn CheckpointStore>,
        chain_id: impl Into<String>,
        relay_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            chain_id: chain_id.into(),
            relay_id: relay_id.into(),
        }
    }

    /// Load the saved checkpoint (returns `None` if none exists).
    pub async fn load(&self) -> Result<Option<Checkpoint>, RelayError> {
        self.store.load(&self.chain_id, &self.relay_id).await
    }

    /// Save a checkpoint at `position`.
    ///
    /// Call this only after every event up to `position` has been
    /// confirmed forwarded.
    pub async fn save(&self, position: ChainPosition) -> Result<(), RelayError> {
        let cp = Checkpoint {
            chain_id: self.chain_id.clone(),
            relay_id: self.relay_id.clone(),
            position,
            updated_at: chrono::Utc::now().timestamp(),
        };
        self.store.save(cp).await
    }

    /// Compute the position to open the stream at: `checkpoint + 1`, or
    /// `default` when no checkpoint exists.
    ///
    /// Starting before the resume position risks duplicate emission
    /// (acceptable); starting after it causes silent gaps (never allowed).
    pub async fn resume_position(
        &self,
        default: ChainPosition,
    ) -> Result<ChainPosition, RelayError> {
        Ok(match self.load().await? {
            Some(cp) => cp.position + 1,
            None => default,
        })
    }
}

// ─── In-memory store (for testing) ────────────────────────────────────────────

use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory checkpoint store for tests and ephemeral relays.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    data: Mutex<HashMap<String, Checkpoint>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(chain_id: &str, relay_id: &str) -> String {
        format!("{chain_id}:{relay_id}")
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(
        &self,
        chain_id: &str,
        relay_id: &str,
    ) -> Result<Option<Checkpoint>, RelayError> {
        Ok(self.data.lock().unwrap().get(&Self::key(chain_id, relay_id)).cloned())
    }

    async fn save(&self, checkpoint: Checkpoint) -> Result<(), RelayError> {
        let key = Self::key(&checkpoint.chain_id, &checkpoint.relay_id);
        self.data.lock().unwrap().insert(key, checkpoint);
        Ok(())
    }

    async fn delete(&self, chain_id: &str, relay_id: &str) -> Result<(), RelayError> {
        self.data.lock().unwrap().remove(&Self::key(chain_id, relay_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = Box::new(MemoryCheckpointStore::new());
        let mgr = CheckpointManager::new(store, "aptos-devnet", "counter-relay");

        // No checkpoint initially
        assert!(mgr.load().await.unwrap().is_none());

        mgr.save(986_962).await.unwrap();

        let cp = mgr.load().await.unwrap().unwrap();
        assert_eq!(cp.position, 986_962);
        assert_eq!(cp.chain_id, "aptos-devnet");
        assert_eq!(cp.relay_id, "counter-relay");
    }

    #[tokio::test]
    async fn resume_is_checkpoint_plus_one() {
        let store = Box::new(MemoryCheckpointStore::new());
        let mgr = CheckpointManager::new(store, "aptos-devnet", "counter-relay");

        mgr.save(986_962).await.unwrap();
        assert_eq!(mgr.resume_position(0).await.unwrap(), 986_963);
    }

    #[tokio::test]
    async fn resume_falls_back_to_default() {
        let store = Box::new(MemoryCheckpointStore::new());
        let mgr = CheckpointManager::new(store, "aptos-devnet", "counter-relay");

        assert_eq!(mgr.resume_position(500).await.unwrap(), 500);
    }

    #[tokio::test]
    async fn save_is_idempotent_upsert() {
        let store = Box::new(MemoryCheckpointStore::new());
        let mgr = CheckpointManager::new(store, "aptos-devnet", "r");

        mgr.save(100).await.unwrap();
        mgr.save(100).await.unwrap();
        mgr.save(200).await.unwrap();

        let cp = mgr.load().await.unwrap().unwrap();
        assert_eq!(cp.position, 200);
    }

    #[tokio::test]
    async fn delete_resets_relay() {
        let store = MemoryCheckpointStore::new();
        let cp = Checkpoint {
            chain_id: "aptos-devnet".into(),
            relay_id: "r".into(),
            position: 42,
            updated_at: 0,
        };
        store.save(cp).await.unwrap();
        assert!(store.load("aptos-devnet", "r").await.unwrap().is_some());

        store.delete("aptos-devnet", "r").await.unwrap();
        assert!(store.load("aptos-devnet", "r").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn relays_are_isolated_by_key() {
        let store = MemoryCheckpointStore::new();
        for (relay, pos) in [("a", 1u64), ("b", 2u64)] {
            store
                .save(Checkpoint {
                    chain_id: "aptos-devnet".into(),
                    relay_id: relay.into(),
                    position: pos,
                    updated_at: 0,
                })
                .await
                .unwrap();
        }

        assert_eq!(store.load("aptos-devnet", "a").await.unwrap().unwrap().position, 1);
        assert_eq!(store.load("aptos-devnet", "b").await.unwrap().unwrap().position, 2);
    }
}
