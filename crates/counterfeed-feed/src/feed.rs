//! Live-merge feed — reconciles a one-shot snapshot with the live event
//! feed into one strictly ordered, duplicate-free timeline.
//!
//! The two sources are independently timed: the snapshot is fetched once at
//! startup, while live batches keep arriving. Reconciliation uses only a
//! streaming comparison against the current head, not a full merge against
//! history — the live feed is assumed to deliver nothing older than the most
//! recent record already known.
//!
//! Invariant: the record list is always sorted descending by `timestamp_us`
//! with no duplicate timestamps, in every reachable state.

use tracing::debug;

use counterfeed_core::types::{CounterEvent, CounterRecord};

/// One subscriber's merged timeline. Owned exclusively by that subscriber;
/// mutated only by the initial snapshot load and by prepending newer
/// records.
#[derive(Debug, Default)]
pub struct LiveFeed {
    /// Records in descending `timestamp_us` order. Never reordered in
    /// place after the initial sort.
    records: Vec<CounterRecord>,
    /// Counter value carried by the newest applied live event.
    value: Option<String>,
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the snapshot as the initial timeline. The input may arrive
    /// unsorted; it is sorted descending here.
    pub fn apply_snapshot(&mut self, mut records: Vec<CounterRecord>) {
        records.sort_by(|a, b| b.timestamp_us.cmp(&a.timestamp_us));
        self.records = records;
    }

    /// Set the displayed counter value (from the initial view query).
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Merge one live batch. Returns the number of records prepended.
    ///
    /// While the timeline is empty — snapshot not yet loaded, or loaded
    /// empty — the batch is discarded: with no known head there is no way
    /// to tell a new event from one the pending snapshot already covers,
    /// so the snapshot stays the sole source of initial truth. Events in
    /// that window surface again via the next live batch or a snapshot
    /// re-fetch.
    ///
    /// Otherwise the batch is sorted descending and only the subset
    /// strictly newer than the current head is prepended; everything at or
    /// below the head is treated as an already-represented duplicate or a
    /// stale replay.
    pub fn apply_live_batch(&mut self, mut events: Vec<CounterEvent>) -> usize {
        let head = match self.records.first() {
            Some(record) => record.timestamp_us,
            None => {
                debug!(dropped = events.len(), "live batch before snapshot, discarding");
                return 0;
            }
        };

        events.sort_by(|a, b| b.timestamp_us.cmp(&a.timestamp_us));
        let newer: Vec<CounterEvent> =
            events.into_iter().filter(|e| e.timestamp_us > head).collect();
        if newer.is_empty() {
            return 0;
        }

        self.value = Some(newer[0].value.clone());
        let prepended = newer.len();
        let mut merged: Vec<CounterRecord> =
            newer.iter().map(CounterRecord::from).collect();
        merged.append(&mut self.records);
        self.records = merged;
        prepended
    }

    /// The merged timeline, newest first.
    pub fn records(&self) -> &[CounterRecord] {
        &self.records
    }

    /// The displayed counter value, if known.
    pub fn current_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Timestamp of the newest record, if any.
    pub fn head_timestamp(&self) -> Option<u64> {
        self.records.first().map(|r| r.timestamp_us)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
