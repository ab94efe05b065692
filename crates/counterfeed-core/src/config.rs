//! Relay configuration and the fluent builder API.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::types::ChainPosition;

/// Stream compression negotiated with the source. Chain payloads are large
/// and bursty, so the default is gzip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compression {
    None,
    Deflate,
    Gzip,
    GzipStream,
}

/// Configuration for a relay instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Unique name for this relay (used for checkpoint keys).
    pub id: String,
    /// Chain to relay from (e.g. `"aptos-devnet"`).
    pub chain: String,
    /// Address of the counter module whose events are relayed.
    pub module_address: String,
    /// Fan-out channel name live events are published to.
    pub channel: String,
    /// Position to open the stream at when no checkpoint exists.
    pub starting_position: ChainPosition,
    /// Compression negotiated with the source stream.
    pub compression: Compression,
    /// Receive-size cap in bytes. `None` = unlimited — batches must never
    /// be truncated by the transport.
    pub max_receive_bytes: Option<usize>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            id: "default".into(),
            chain: "aptos-devnet".into(),
            module_address: String::new(),
            channel: "aptos-counter".into(),
            starting_position: 0,
            compression: Compression::Gzip,
            max_receive_bytes: None,
        }
    }
}

impl RelayConfig {
    /// Validate the configuration. Failures here are fatal: the relay has
    /// no safe way to run with an unknown module or channel.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.module_address.is_empty() {
            return Err(RelayError::Config("module_address must not be empty".into()));
        }
        if self.channel.is_empty() {
            return Err(RelayError::Config("channel must not be empty".into()));
        }
        Ok(())
    }
}

/// Fluent builder for [`RelayConfig`].
///
/// # Example
///
/// ```rust
/// use counterfeed_core::config::RelayBuilder;
///
/// let config = RelayBuilder::new()
///     .id("counter-relay")
///     .chain("aptos-devnet")
///     .module_address("0x25eeef73f1b22092fc2a57a8647f12afb1606d16ebe0c4afd675517402dd2e56")
///     .channel("aptos-counter")
///     .starting_position(986_962)
///     .build();
/// ```
#[derive(Default)]
pub struct RelayBuilder {
    config: RelayConfig,
}

impl RelayBuilder {
    pub fn new() -> Self {
        Self {
            config: RelayConfig::default(),
        }
    }

    /// Set the relay ID (used for checkpoint keys).
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.config.id = id.into();
        self
    }

    /// Set the chain to relay from.
    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.config.chain = chain.into();
        self
    }

    /// Set the counter module address.
    pub fn module_address(mut self, address: impl Into<String>) -> Self {
        self.config.module_address = address.into();
        self
    }

    /// Set the fan-out channel name.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.config.channel = channel.into();
        self
    }

    /// Set the position to start from when no checkpoint exists.
    pub fn starting_position(mut self, position: ChainPosition) -> Self {
        self.config.starting_position = position;
        self
    }

    /// Set the stream compression.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Cap the receive size in bytes (default: unlimited).
    pub fn max_receive_bytes(mut self, bytes: usize) -> Self {
        self.config.max_receive_bytes = Some(bytes);
        self
    }

    /// Build the [`RelayConfig`].
    pub fn build(self) -> RelayConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let cfg = RelayBuilder::new().build();
        assert_eq!(cfg.chain, "aptos-devnet");
        assert_eq!(cfg.channel, "aptos-counter");
        assert_eq!(cfg.compression, Compression::Gzip);
        assert_eq!(cfg.max_receive_bytes, None);
        assert_eq!(cfg.starting_position, 0);
    }

    #[test]
    fn builder_custom() {
        let cfg = RelayBuilder::new()
            .id("my-relay")
            .chain("aptos-mainnet")
            .module_address("0xcafe")
            .channel("counter-live")
            .starting_position(986_962)
            .compression(Compression::GzipStream)
            .max_receive_bytes(16 * 1024 * 1024)
            .build();

        assert_eq!(cfg.id, "my-relay");
        assert_eq!(cfg.chain, "aptos-mainnet");
        assert_eq!(cfg.module_address, "0xcafe");
        assert_eq!(cfg.channel, "counter-live");
        assert_eq!(cfg.starting_position, 986_962);
        assert_eq!(cfg.compression, Compression::GzipStream);
        assert_eq!(cfg.max_receive_bytes, Some(16 * 1024 * 1024));
    }

    #[test]
    fn validate_rejects_empty_module_address() {
        let cfg = RelayBuilder::new().channel("c").build();
        let err = cfg.validate().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn validate_rejects_empty_channel() {
        let cfg = RelayBuilder::new().module_address("0xcafe").channel("").build();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_config() {
        let cfg = RelayBuilder::new().module_address("0xcafe").build();
        assert!(cfg.validate().is_ok());
    }
}
