//! Source stream boundary — where transactions enter the relay.
//!
//! The source is consumed with a pull loop rather than data callbacks:
//! the relay simply does not pull the next batch until the previous one is
//! fully forwarded and checkpointed, so flow control is ordinary
//! backpressure instead of imperative pause/resume calls. Transport
//! reconnect and backoff live behind the trait.

use async_trait::async_trait;

use counterfeed_core::config::{Compression, RelayConfig};
use counterfeed_core::error::RelayError;
use counterfeed_core::types::{ChainPosition, TransactionBatch};

/// Options for opening the source stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    /// First position the stream must deliver.
    pub starting_position: ChainPosition,
    pub compression: Compression,
    /// `None` = unlimited. Batches must never be truncated.
    pub max_receive_bytes: Option<usize>,
}

impl StreamOptions {
    /// Derive stream options from the relay config at a given position.
    pub fn for_config(config: &RelayConfig, starting_position: ChainPosition) -> Self {
        Self {
            starting_position,
            compression: config.compression,
            max_receive_bytes: config.max_receive_bytes,
        }
    }
}

/// Trait for pulling an ordered sequence of transaction batches from a
/// resumable position.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Open (or reopen) the stream at `options.starting_position`.
    ///
    /// Reopening after a publish failure redelivers everything from the
    /// unadvanced checkpoint onward.
    async fn open(&mut self, options: StreamOptions) -> Result<(), RelayError>;

    /// Pull the next batch. `None` means the stream ended (bounded sources
    /// and tests); a live chain stream never returns `None`.
    async fn next_batch(&mut self) -> Result<Option<TransactionBatch>, RelayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterfeed_core::config::RelayBuilder;

    #[test]
    fn options_follow_config() {
        let config = RelayBuilder::new()
            .module_address("0xcafe")
            .compression(Compression::GzipStream)
            .max_receive_bytes(1024)
            .build();

        let opts = StreamOptions::for_config(&config, 986_963);
        assert_eq!(opts.starting_position, 986_963);
        assert_eq!(opts.compression, Compression::GzipStream);
        assert_eq!(opts.max_receive_bytes, Some(1024));
    }

    #[test]
    fn receive_size_is_unlimited_by_default() {
        let config = RelayBuilder::new().module_address("0xcafe").build();
        let opts = StreamOptions::for_config(&config, 0);
        assert_eq!(opts.max_receive_bytes, None);
    }
}
