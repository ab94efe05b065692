//! counterfeed-feed — the subscriber side: snapshot query boundary,
//! live-merge aggregation, and optional name enrichment.

pub mod enrich;
pub mod feed;
pub mod session;
pub mod snapshot;

pub use enrich::{NameDirectory, NameResolver};
pub use feed::LiveFeed;
pub use session::FeedSession;
pub use snapshot::SnapshotClient;
