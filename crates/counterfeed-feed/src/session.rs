//! Feed session — one subscriber's view of the counter: a subscription,
//! one snapshot query, and the live-merge feed.
//!
//! Sessions are independent; each open UI session runs its own. The
//! subscription is taken before the snapshot is fetched, so events racing
//! the fetch land in the pre-snapshot window and are discarded by the
//! feed's empty gate — the snapshot is the sole source of initial truth.

use tracing::info;

use counterfeed_core::error::RelayError;
use counterfeed_relay::publisher::Subscription;

use crate::feed::LiveFeed;
use crate::snapshot::SnapshotClient;

/// A running subscriber session.
pub struct FeedSession {
    feed: LiveFeed,
    subscription: Subscription,
}

impl FeedSession {
    /// Start a session: fetch the snapshot and current value over an
    /// already-open subscription.
    pub async fn start(
        snapshot: &dyn SnapshotClient,
        subscription: Subscription,
    ) -> Result<Self, RelayError> {
        let mut feed = LiveFeed::new();
        feed.set_value(snapshot.current_value().await?.to_string());

        let records = snapshot.all_records().await?;
        info!(records = records.len(), "snapshot loaded");
        feed.apply_snapshot(records);

        Ok(Self { feed, subscription })
    }

    /// Await one live batch and merge it. Returns the number of records
    /// prepended, or `None` when the publisher side has gone away (the
    /// session then stops advancing until a new one is started).
    pub async fn pump_one(&mut self) -> Option<usize> {
        let batch = self.subscription.recv().await?;
        Some(self.feed.apply_live_batch(batch))
    }

    /// The merged timeline.
    pub fn feed(&self) -> &LiveFeed {
        &self.feed
    }
}
