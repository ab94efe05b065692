//! Counter event filter — pure extraction of counter events from one
//! source transaction.
//!
//! Only `User` transactions are inspected; an event qualifies when its type
//! tag contains the configured module address. Malformed payloads are
//! skipped, never raised — one bad event must not block the stream.

use tracing::debug;

use crate::types::{CounterEvent, Transaction, TransactionKind};

/// Filters raw transaction events down to counter events for one module.
#[derive(Debug, Clone)]
pub struct CounterEventFilter {
    module_address: String,
}

impl CounterEventFilter {
    pub fn new(module_address: impl Into<String>) -> Self {
        Self {
            module_address: module_address.into(),
        }
    }

    /// The module address this filter matches against.
    pub fn module_address(&self) -> &str {
        &self.module_address
    }

    /// Fully qualified type of the counter record event.
    pub fn event_type(&self) -> String {
        format!("{}::counter::CounterRecordEvent", self.module_address)
    }

    /// Returns `true` if `type_tag` belongs to the configured module.
    pub fn matches_type_tag(&self, type_tag: &str) -> bool {
        type_tag.contains(&self.module_address)
    }

    /// Extract all counter events from a transaction, in emission order.
    ///
    /// Non-`User` transactions yield an empty vec. Events whose payload
    /// fails to decode are dropped.
    pub fn extract(&self, transaction: &Transaction) -> Vec<CounterEvent> {
        if transaction.kind != TransactionKind::User {
            return vec![];
        }

        let mut events = Vec::new();
        for raw in &transaction.events {
            if !self.matches_type_tag(&raw.type_tag) {
                continue;
            }
            match serde_json::from_value::<CounterEvent>(raw.payload.clone()) {
                Ok(event) => events.push(event),
                Err(err) => {
                    debug!(
                        position = transaction.position,
                        type_tag = %raw.type_tag,
                        %err,
                        "skipping malformed counter event"
                    );
                }
            }
        }
        events
    }
}
