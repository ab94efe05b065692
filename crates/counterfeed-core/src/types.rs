//! Shared types for the relay pipeline.

use serde::{Deserialize, Serialize};

/// Monotonically increasing index into the source transaction log
/// (the chain's transaction version).
pub type ChainPosition = u64;

// ─── Transactions ────────────────────────────────────────────────────────────

/// Kind of a source transaction. Only `User` transactions carry
/// application events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Genesis,
    BlockMetadata,
    StateCheckpoint,
    User,
    /// Any kind this relay does not recognize. Treated like a
    /// non-`User` transaction: never inspected.
    Unknown,
}

/// A raw event attached to a transaction, exactly as the source delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Fully qualified Move type tag
    /// (e.g. `0x25ee…::counter::CounterRecordEvent`).
    pub type_tag: String,
    /// Undecoded event payload.
    pub payload: serde_json::Value,
}

/// One transaction from the source stream. Owned transiently by the relay
/// for the duration of filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Position (version) in the source log.
    pub position: ChainPosition,
    pub kind: TransactionKind,
    /// Attached raw events, in emission order.
    pub events: Vec<RawEvent>,
}

/// An ordered batch of transactions as pushed by the source stream.
#[derive(Debug, Clone, Default)]
pub struct TransactionBatch {
    /// Transactions in ascending position order.
    pub transactions: Vec<Transaction>,
}

impl TransactionBatch {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Highest position in the batch, or `None` for an empty batch.
    pub fn max_position(&self) -> Option<ChainPosition> {
        self.transactions.iter().map(|t| t.position).max()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

// ─── Counter events ──────────────────────────────────────────────────────────

/// Action recorded by the on-chain counter module. The numeric discriminants
/// are the on-chain representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CounterAction {
    Increment = 1,
    Decrement = 2,
    Random = 3,
}

impl From<CounterAction> for u8 {
    fn from(action: CounterAction) -> u8 {
        action as u8
    }
}

impl TryFrom<u8> for CounterAction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Increment),
            2 => Ok(Self::Decrement),
            3 => Ok(Self::Random),
            other => Err(format!("unknown counter action: {other}")),
        }
    }
}

/// A single application-level occurrence extracted from a transaction.
/// Immutable once created; its lifetime ends at publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterEvent {
    /// Microseconds since epoch. Unique and strictly increasing per
    /// occurrence in the source domain — this is the dedup key.
    pub timestamp_us: u64,
    /// Address of the account that performed the action.
    pub actor: String,
    pub action: CounterAction,
    /// Counter value after the action, as the chain renders it.
    pub value: String,
}

/// A historical record from the snapshot query — the same identity fields
/// as [`CounterEvent`] minus `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub timestamp_us: u64,
    pub actor: String,
    pub action: CounterAction,
}

impl From<CounterEvent> for CounterRecord {
    fn from(event: CounterEvent) -> Self {
        Self {
            timestamp_us: event.timestamp_us,
            actor: event.actor,
            action: event.action,
        }
    }
}

impl From<&CounterEvent> for CounterRecord {
    fn from(event: &CounterEvent) -> Self {
        Self {
            timestamp_us: event.timestamp_us,
            actor: event.actor.clone(),
            action: event.action,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
