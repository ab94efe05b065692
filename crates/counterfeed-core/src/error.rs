//! Error types for the relay pipeline.

use thiserror::Error;

/// Errors that can occur while relaying or merging events.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Transport-level source error (network blip, stream reset).
    /// Recoverable: the stream is reopened from the last checkpoint.
    #[error("source error: {0}")]
    Source(String),

    /// A publish to the fan-out channel failed. Recoverable: the
    /// checkpoint is withheld and the batch redelivered.
    #[error("publish error: {0}")]
    Publish(String),

    /// Checkpoint store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Snapshot view query failed.
    #[error("snapshot query error: {0}")]
    Snapshot(String),

    /// The source rejected our credentials. Fatal: there is no safe way
    /// to proceed without a valid stream.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Invalid relay configuration. Fatal.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Returns `true` if the error must terminate the relay process
    /// rather than trigger a retry cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(RelayError::Auth("bad key".into()).is_fatal());
        assert!(RelayError::Config("empty channel".into()).is_fatal());
        assert!(!RelayError::Source("reset".into()).is_fatal());
        assert!(!RelayError::Publish("down".into()).is_fatal());
        assert!(!RelayError::Storage("io".into()).is_fatal());
    }
}
