//! Broker clients.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::BrokerError;

/// A message ready for the external broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    /// Broker topic, already mapped from the domain topic.
    pub topic: String,
    /// Partition key taken from the payload's `id`.
    pub key: Option<String>,
    /// JSON-encoded payload.
    pub body: String,
}

/// Sends a message to the broker and waits for its acknowledgement.
#[async_trait]
pub trait RemotePublisher: Send + Sync {
    async fn send(&self, message: &BrokerMessage) -> Result<(), BrokerError>;
}

/// Publisher for local-only mode; accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

#[async_trait]
impl RemotePublisher for NullPublisher {
    async fn send(&self, _message: &BrokerMessage) -> Result<(), BrokerError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryPublisherState {
    sent: Vec<BrokerMessage>,
    failures_remaining: u32,
    attempts: u32,
}

/// In-memory broker for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    state: Arc<Mutex<InMemoryPublisherState>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` sends fail.
    pub async fn fail_next(&self, count: u32) {
        self.state.lock().await.failures_remaining = count;
    }

    /// Returns the acknowledged messages in send order.
    pub async fn sent(&self) -> Vec<BrokerMessage> {
        self.state.lock().await.sent.clone()
    }

    /// Returns the number of send attempts, failed ones included.
    pub async fn attempts(&self) -> u32 {
        self.state.lock().await.attempts
    }
}

#[async_trait]
impl RemotePublisher for InMemoryPublisher {
    async fn send(&self, message: &BrokerMessage) -> Result<(), BrokerError> {
        let mut state = self.state.lock().await;
        state.attempts += 1;

        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(BrokerError::Send("broker unavailable".to_string()));
        }

        state.sent.push(message.clone());
        Ok(())
    }
}
