//! counterfeed-core — foundation for the counter event relay.
//!
//! # Architecture
//!
//! ```text
//! RelayLoop (counterfeed-relay)
//!     ├── CounterEventFilter  (pure USER-kind / type-tag extraction)
//!     ├── CheckpointManager   (crash recovery, resume = checkpoint + 1)
//!     └── EventPublisher      (best-effort channel fan-out)
//! LiveFeed (counterfeed-feed)
//!     └── snapshot + live merge, one instance per subscriber
//! ```

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod filter;
pub mod types;

pub use checkpoint::{Checkpoint, CheckpointManager, CheckpointStore, MemoryCheckpointStore};
pub use config::{Compression, RelayBuilder, RelayConfig};
pub use error::RelayError;
pub use filter::CounterEventFilter;
pub use types::{
    ChainPosition, CounterAction, CounterEvent, CounterRecord, RawEvent, Transaction,
    TransactionBatch, TransactionKind,
};
