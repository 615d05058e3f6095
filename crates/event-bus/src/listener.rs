//! In-process event listeners.

use async_trait::async_trait;

use crate::DomainEvent;

/// Error type returned by listeners. Any error is accepted; the bus only logs it.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber that reacts to domain events in the publishing task.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Returns the name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Handles a single event.
    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError>;
}
