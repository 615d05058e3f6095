//! Domain event record.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// An immutable `(topic, payload)` pair emitted after the owning write commits.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl DomainEvent {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    /// Serializes a typed payload into an event.
    pub fn encode<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(topic, serde_json::to_value(payload)?))
    }

    /// Deserializes the payload into the listener's expected type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }

    /// Partition key for the broker: the payload's `id` field, if present.
    pub fn key(&self) -> Option<String> {
        match self.payload.get("id")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
