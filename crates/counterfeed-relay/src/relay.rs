//! The relay loop — pulls transaction batches, filters them, forwards
//! counter events to the publisher, and advances the checkpoint.
//!
//! # Per-batch discipline
//! Exactly one batch is in flight at a time. For each batch:
//!   - run the filter over every transaction in arrival order,
//!   - publish each transaction's events in order, awaited to completion,
//!   - save the checkpoint at the batch's highest position only after all
//!     forwards succeed,
//!   - then pull the next batch.
//!
//! The checkpoint never advances past a position whose events were not
//! confirmed forwarded. On a publish failure the stream is reopened at
//! `checkpoint + 1`, redelivering the failed batch; the resulting duplicates
//! are absorbed downstream by the feed's head filter.

use tracing::{info, warn};

use counterfeed_core::checkpoint::{CheckpointManager, CheckpointStore};
use counterfeed_core::config::RelayConfig;
use counterfeed_core::error::RelayError;
use counterfeed_core::filter::CounterEventFilter;
use counterfeed_core::types::TransactionBatch;

use crate::publisher::EventPublisher;
use crate::source::{StreamOptions, TransactionSource};

/// The relay's stream consumer. Owns one source handle, one publisher
/// handle, and the checkpoint for its relay id.
pub struct RelayLoop<S: TransactionSource, P: EventPublisher> {
    config: RelayConfig,
    filter: CounterEventFilter,
    source: S,
    publisher: P,
    checkpoint: CheckpointManager,
}

impl<S: TransactionSource, P: EventPublisher> RelayLoop<S, P> {
    pub fn new(
        config: RelayConfig,
        source: S,
        publisher: P,
        store: Box<dyn CheckpointStore>,
    ) -> Self {
        let checkpoint = CheckpointManager::new(store, &config.chain, &config.id);
        Self {
            filter: CounterEventFilter::new(&config.module_address),
            source,
            publisher,
            checkpoint,
            config,
        }
    }

    /// Run the relay until the source ends or a fatal error occurs.
    pub async fn run(&mut self) -> Result<(), RelayError> {
        self.config.validate()?;

        let resume = self
            .checkpoint
            .resume_position(self.config.starting_position)
            .await?;
        info!(
            chain = %self.config.chain,
            relay = %self.config.id,
            position = resume,
            "opening source stream"
        );
        self.source
            .open(StreamOptions::for_config(&self.config, resume))
            .await?;

        while let Some(batch) = self.source.next_batch().await? {
            match self.process_batch(&batch).await {
                Ok(forwarded) => {
                    if let Some(position) = batch.max_position() {
                        self.checkpoint.save(position).await?;
                        info!(
                            position,
                            transactions = batch.len(),
                            forwarded,
                            "batch forwarded"
                        );
                    }
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    // Checkpoint untouched; reopen so the batch is
                    // redelivered on the next pull.
                    warn!(%err, "batch not forwarded, reopening at checkpoint");
                    let resume = self
                        .checkpoint
                        .resume_position(self.config.starting_position)
                        .await?;
                    self.source
                        .open(StreamOptions::for_config(&self.config, resume))
                        .await?;
                }
            }
        }

        info!(relay = %self.config.id, "source stream ended");
        Ok(())
    }

    /// Filter and forward one batch. Returns the number of events
    /// forwarded. Any error leaves the checkpoint where it was.
    async fn process_batch(&self, batch: &TransactionBatch) -> Result<usize, RelayError> {
        let mut forwarded = 0;
        for transaction in &batch.transactions {
            let events = self.filter.extract(transaction);
            if events.is_empty() {
                continue;
            }
            self.publisher.publish(&self.config.channel, &events).await?;
            forwarded += events.len();
        }
        Ok(forwarded)
    }
}
