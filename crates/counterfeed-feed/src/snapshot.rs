//! Snapshot query boundary — the chain's view layer.
//!
//! One synchronous call per subscriber at startup; the snapshot is assumed
//! internally consistent. Sorting is the feed's job, so implementations may
//! return records in any order.

use async_trait::async_trait;

use counterfeed_core::error::RelayError;
use counterfeed_core::types::CounterRecord;

/// Trait for the counter module's view functions.
#[async_trait]
pub trait SnapshotClient: Send + Sync {
    /// All counter records known to the chain (`query_all_records`).
    async fn all_records(&self) -> Result<Vec<CounterRecord>, RelayError>;

    /// The current counter value (`get_value`).
    async fn current_value(&self) -> Result<u64, RelayError>;
}
