//! Event bus error types.

use thiserror::Error;

/// Failure reported by a broker client for a single send.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// The client could not be created.
    #[error("Broker connection failed: {0}")]
    Connect(String),

    /// The broker rejected or never acknowledged the message.
    #[error("Broker send failed: {0}")]
    Send(String),

    /// No acknowledgement within the send timeout.
    #[error("Broker send timed out")]
    Timeout,
}

/// Errors returned by [`crate::EventBus::publish`].
#[derive(Debug, Error)]
pub enum EventPublishError {
    /// The payload could not be serialized.
    #[error("Failed to encode payload for {topic}: {source}")]
    Encode {
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    /// Every broker attempt failed.
    #[error("Failed to publish {topic} after {attempts} attempt(s): {source}")]
    BrokerExhausted {
        topic: String,
        attempts: u32,
        #[source]
        source: BrokerError,
    },
}

/// Convenience type alias for event bus results.
pub type Result<T> = std::result::Result<T, EventPublishError>;
