//! Event publisher — best-effort fan-out of counter events over named
//! channels.
//!
//! Delivery reaches zero, one, or many currently connected subscribers.
//! Subscribers that are offline at publish time get nothing and recover by
//! re-fetching a snapshot; a slow subscriber may observe lag and miss
//! intermediate batches, which the same snapshot path covers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use counterfeed_core::error::RelayError;
use counterfeed_core::types::CounterEvent;

/// Per-channel broadcast capacity. Lagging subscribers lose the oldest
/// batches first.
const CHANNEL_CAPACITY: usize = 256;

/// Trait for publishing counter events to a named channel.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a batch of events. A failure here is reported to the relay
    /// loop, which withholds the checkpoint for the batch.
    async fn publish(&self, channel: &str, events: &[CounterEvent]) -> Result<(), RelayError>;
}

#[async_trait]
impl<P: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<P> {
    async fn publish(&self, channel: &str, events: &[CounterEvent]) -> Result<(), RelayError> {
        (**self).publish(channel, events).await
    }
}

/// In-process channel bus backed by `tokio::sync::broadcast`.
///
/// Channels are created lazily on first publish or subscribe. Publishing
/// with no subscribers attached succeeds — delivery is best-effort.
#[derive(Default)]
pub struct ChannelBus {
    channels: Mutex<HashMap<String, broadcast::Sender<Vec<CounterEvent>>>>,
}

impl ChannelBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<Vec<CounterEvent>> {
        self.channels
            .lock()
            .unwrap()
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a channel. Only batches published after this call are
    /// delivered.
    pub fn subscribe(&self, channel: &str) -> Subscription {
        Subscription {
            receiver: self.sender(channel).subscribe(),
        }
    }

    /// Number of live subscribers on a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .lock()
            .unwrap()
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventPublisher for ChannelBus {
    async fn publish(&self, channel: &str, events: &[CounterEvent]) -> Result<(), RelayError> {
        if events.is_empty() {
            return Ok(());
        }
        let sender = self.sender(channel);
        // send() errs only when no receiver exists, which is fine:
        // best-effort delivery to whoever is connected.
        let delivered = sender.send(events.to_vec()).unwrap_or(0);
        debug!(channel, events = events.len(), delivered, "published batch");
        Ok(())
    }
}

/// A live subscription to one channel.
pub struct Subscription {
    receiver: broadcast::Receiver<Vec<CounterEvent>>,
}

impl Subscription {
    /// Await the next event batch.
    ///
    /// Lag notifications are skipped (the missed batches are gone, and the
    /// snapshot path makes up for them). Returns `None` once the channel
    /// is closed.
    pub async fn recv(&mut self) -> Option<Vec<CounterEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(batch) => return Some(batch),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "subscription lagged, skipping");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
