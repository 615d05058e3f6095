//! Listeners that publish follow-up events from inside a delivery.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use event_bus::{DomainEvent, EventBus, EventListener, ListenerError};
use serde_json::json;
use tokio::sync::Mutex;

struct Relay {
    bus: OnceLock<Arc<EventBus>>,
    next_topic: &'static str,
}

#[async_trait]
impl EventListener for Relay {
    fn name(&self) -> &'static str {
        "Relay"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError> {
        let bus = self.bus.get().ok_or("bus not wired")?;
        bus.publish(self.next_topic, &event.payload).await?;
        Ok(())
    }
}

struct Sink {
    seen: Arc<Mutex<Vec<DomainEvent>>>,
}

#[async_trait]
impl EventListener for Sink {
    fn name(&self) -> &'static str {
        "Sink"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), ListenerError> {
        self.seen.lock().await.push(event.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_listener_can_publish_during_delivery() {
    let bus = Arc::new(EventBus::local_only());
    let relay = Arc::new(Relay {
        bus: OnceLock::new(),
        next_topic: "order.created",
    });
    let _ = relay.bus.set(bus.clone());
    let seen = Arc::new(Mutex::new(Vec::new()));

    bus.subscribe("user.created", relay.clone()).await;
    bus.subscribe("order.created", Arc::new(Sink { seen: seen.clone() }))
        .await;

    let report = bus
        .publish("user.created", &json!({"id": "u-1"}))
        .await
        .unwrap();

    assert_eq!(report.listener_failures, 0);
    let seen = seen.lock().await;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].topic, "order.created");
    assert_eq!(seen[0].payload["id"], "u-1");
}

#[tokio::test]
async fn test_same_event_twice_reaches_listener_twice() {
    let bus = EventBus::local_only();
    let seen = Arc::new(Mutex::new(Vec::new()));
    bus.subscribe("payment.completed", Arc::new(Sink { seen: seen.clone() }))
        .await;

    let payload = json!({"id": "p-1"});
    bus.publish("payment.completed", &payload).await.unwrap();
    bus.publish("payment.completed", &payload).await.unwrap();

    assert_eq!(seen.lock().await.len(), 2);
    assert_eq!(bus.listener_count("payment.completed").await, 1);
}
