//! Domain event bus.
//!
//! Publishing an event runs two channels in sequence:
//!
//! - local delivery to the listeners subscribed to the topic, in the calling
//!   task and in registration order
//! - remote delivery to the external broker through a [`RemotePublisher`],
//!   with bounded exponential backoff
//!
//! In local-only mode the remote step is skipped. There is no deduplication,
//! so listeners must tolerate seeing the same event more than once.

pub mod bus;
pub mod config;
pub mod error;
pub mod event;
#[cfg(feature = "kafka")]
pub mod kafka;
pub mod listener;
pub mod publisher;

pub use bus::{DeliveryReport, EventBus};
pub use config::{BusMode, EventBusConfig};
pub use error::{BrokerError, EventPublishError, Result};
pub use event::DomainEvent;
#[cfg(feature = "kafka")]
pub use kafka::KafkaPublisher;
pub use listener::{EventListener, ListenerError};
pub use publisher::{BrokerMessage, InMemoryPublisher, NullPublisher, RemotePublisher};
