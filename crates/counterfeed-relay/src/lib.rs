//! counterfeed-relay — stream consumer, filter dispatch, and channel
//! fan-out for the counter event relay.

pub mod publisher;
pub mod relay;
pub mod source;

pub use publisher::{ChannelBus, EventPublisher, Subscription};
pub use relay::RelayLoop;
pub use source::{StreamOptions, TransactionSource};
