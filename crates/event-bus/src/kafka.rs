//! Kafka-compatible broker client.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;

use crate::{BrokerError, BrokerMessage, EventBusConfig, RemotePublisher};

/// Publishes through an `rdkafka` [`FutureProducer`].
pub struct KafkaPublisher {
    producer: FutureProducer,
    send_timeout: Duration,
}

impl KafkaPublisher {
    pub fn new(config: &EventBusConfig) -> Result<Self, BrokerError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", &config.client_id)
            .set(
                "message.timeout.ms",
                config.send_timeout.as_millis().to_string(),
            )
            .create()
            .map_err(|e| BrokerError::Connect(e.to_string()))?;

        tracing::info!(brokers = %config.brokers, client_id = %config.client_id, "kafka producer created");

        Ok(Self {
            producer,
            send_timeout: config.send_timeout,
        })
    }
}

#[async_trait]
impl RemotePublisher for KafkaPublisher {
    async fn send(&self, message: &BrokerMessage) -> Result<(), BrokerError> {
        let mut record = FutureRecord::<str, str>::to(&message.topic).payload(&message.body);
        if let Some(key) = &message.key {
            record = record.key(key.as_str());
        }

        self.producer
            .send(record, Timeout::After(self.send_timeout))
            .await
            .map(|_| ())
            .map_err(|(e, _)| match e {
                rdkafka::error::KafkaError::MessageProduction(
                    rdkafka::types::RDKafkaErrorCode::MessageTimedOut,
                ) => BrokerError::Timeout,
                other => BrokerError::Send(other.to_string()),
            })
    }
}
