//! counterfeed-storage — durable checkpoint backends.
//!
//! Backends:
//! - memory — re-exported from `counterfeed-core` (dev/testing, no persistence)
//! - [`sqlite`] — SQLite via `sqlx` (embedded, single-file persistence)

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCheckpointStore;

pub use counterfeed_core::checkpoint::MemoryCheckpointStore;
