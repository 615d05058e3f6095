//! Event bus with an explicit subscription table.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    BrokerMessage, BusMode, DomainEvent, EventBusConfig, EventListener, EventPublishError,
    NullPublisher, RemotePublisher, Result,
};

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub topic: String,
    /// Listeners invoked for the topic.
    pub listeners_invoked: usize,
    /// Listeners that returned an error. Their failures are logged, not raised.
    pub listener_failures: usize,
    /// True when the broker acknowledged the message; false in local-only mode.
    pub broker_confirmed: bool,
}

/// Fans events out to local listeners and to the external broker.
///
/// Subscriptions are made at startup; a topic's listeners always run in the
/// order they were subscribed.
pub struct EventBus {
    subscriptions: RwLock<HashMap<String, Vec<Arc<dyn EventListener>>>>,
    publisher: Arc<dyn RemotePublisher>,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new(config: EventBusConfig, publisher: Arc<dyn RemotePublisher>) -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            publisher,
            config,
        }
    }

    /// Creates a bus that never leaves the process.
    pub fn local_only() -> Self {
        Self::new(EventBusConfig::local_only(), Arc::new(NullPublisher))
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Appends a listener to the topic's list.
    pub async fn subscribe(&self, topic: &str, listener: Arc<dyn EventListener>) {
        tracing::debug!(topic, listener = listener.name(), "listener subscribed");
        self.subscriptions
            .write()
            .await
            .entry(topic.to_string())
            .or_default()
            .push(listener);
    }

    /// Returns the number of listeners registered for a topic.
    pub async fn listener_count(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Serializes `payload` and publishes it under `topic`.
    pub async fn publish<T: Serialize + ?Sized>(
        &self,
        topic: &str,
        payload: &T,
    ) -> Result<DeliveryReport> {
        let payload = serde_json::to_value(payload).map_err(|source| EventPublishError::Encode {
            topic: topic.to_string(),
            source,
        })?;
        self.publish_event(DomainEvent::new(topic, payload)).await
    }

    /// Delivers an event locally, then to the broker unless local-only.
    #[tracing::instrument(skip(self, event), fields(topic = %event.topic))]
    pub async fn publish_event(&self, event: DomainEvent) -> Result<DeliveryReport> {
        let (listeners_invoked, listener_failures) = self.deliver_locally(&event).await;

        let broker_confirmed = match self.config.mode {
            BusMode::LocalOnly => false,
            BusMode::External => {
                self.deliver_remotely(&event).await?;
                true
            }
        };

        metrics::counter!("event_bus_published_total", "topic" => event.topic.clone())
            .increment(1);

        Ok(DeliveryReport {
            topic: event.topic,
            listeners_invoked,
            listener_failures,
            broker_confirmed,
        })
    }

    async fn deliver_locally(&self, event: &DomainEvent) -> (usize, usize) {
        // Cloned out so a listener may publish without holding the table lock.
        let listeners = self
            .subscriptions
            .read()
            .await
            .get(&event.topic)
            .cloned()
            .unwrap_or_default();

        let mut failures = 0;
        for listener in &listeners {
            if let Err(error) = listener.handle(event).await {
                failures += 1;
                metrics::counter!(
                    "event_bus_listener_failures_total",
                    "topic" => event.topic.clone(),
                    "listener" => listener.name()
                )
                .increment(1);
                tracing::warn!(
                    topic = %event.topic,
                    listener = listener.name(),
                    error = %error,
                    "event listener failed"
                );
            }
        }

        (listeners.len(), failures)
    }

    async fn deliver_remotely(&self, event: &DomainEvent) -> Result<()> {
        let message = BrokerMessage {
            topic: self.config.broker_topic(&event.topic).to_string(),
            key: event.key(),
            body: event.payload.to_string(),
        };

        let policy = &self.config.retry;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.publisher.send(&message).await {
                Ok(()) => {
                    tracing::debug!(broker_topic = %message.topic, attempt, "event sent to broker");
                    return Ok(());
                }
                Err(source) if !policy.should_retry(attempt) => {
                    tracing::error!(
                        broker_topic = %message.topic,
                        attempts = attempt,
                        error = %source,
                        "broker publish failed"
                    );
                    return Err(EventPublishError::BrokerExhausted {
                        topic: event.topic.clone(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(error) => {
                    let delay = policy.delay_after(attempt);
                    metrics::counter!("event_bus_broker_retries_total").increment(1);
                    tracing::warn!(
                        broker_topic = %message.topic,
                        attempt,
                        error = %error,
                        delay_ms = delay.as_millis() as u64,
                        "broker publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
