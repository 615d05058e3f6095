//! Event bus configuration.

use std::collections::HashMap;
use std::time::Duration;

use common::RetryPolicy;

/// Whether events leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusMode {
    /// Local listeners plus the external broker.
    External,
    /// Local listeners only; the broker step is a no-op.
    #[default]
    LocalOnly,
}

impl std::str::FromStr for BusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kafka" | "external" => Ok(BusMode::External),
            "local" | "null" | "none" => Ok(BusMode::LocalOnly),
            other => Err(format!("unknown event bus mode: {other}")),
        }
    }
}

/// Event bus settings.
///
/// Reads from environment variables:
/// - `EVENT_BUS_MODE` — `kafka` or `local` (default: `local`)
/// - `KAFKA_BROKERS` — bootstrap servers (default: `"kafka:9092"`)
/// - `KAFKA_CLIENT_ID` — producer client id (default: `"modulith-app"`)
/// - `KAFKA_TOPIC_USERS`, `KAFKA_TOPIC_ORDERS`, `KAFKA_TOPIC_PAYMENTS` — broker
///   topic for each domain topic
/// - `EVENT_BUS_MAX_ATTEMPTS` (default: `3`), `EVENT_BUS_BACKOFF_MS` (default: `100`)
/// - `EVENT_BUS_SEND_TIMEOUT_MS` (default: `5000`)
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    pub mode: BusMode,
    pub brokers: String,
    pub client_id: String,
    /// Domain topic to broker topic. Unmapped topics are sent under their own name.
    pub topics: HashMap<String, String>,
    pub retry: RetryPolicy,
    pub send_timeout: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        let topics = [
            ("user.created", "users.created"),
            ("order.created", "orders.created"),
            ("payment.completed", "payments.completed"),
        ]
        .into_iter()
        .map(|(domain, broker)| (domain.to_string(), broker.to_string()))
        .collect();

        Self {
            mode: BusMode::LocalOnly,
            brokers: "kafka:9092".to_string(),
            client_id: "modulith-app".to_string(),
            topics,
            retry: RetryPolicy::default(),
            send_timeout: Duration::from_millis(5000),
        }
    }
}

impl EventBusConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup("EVENT_BUS_MODE") {
            config.mode = mode.parse()?;
        }
        if let Some(brokers) = lookup("KAFKA_BROKERS") {
            config.brokers = brokers;
        }
        if let Some(client_id) = lookup("KAFKA_CLIENT_ID") {
            config.client_id = client_id;
        }
        for (key, domain_topic) in [
            ("KAFKA_TOPIC_USERS", "user.created"),
            ("KAFKA_TOPIC_ORDERS", "order.created"),
            ("KAFKA_TOPIC_PAYMENTS", "payment.completed"),
        ] {
            if let Some(topic) = lookup(key) {
                config.topics.insert(domain_topic.to_string(), topic);
            }
        }

        let attempts = parse_or(&lookup, "EVENT_BUS_MAX_ATTEMPTS", 3u32)?;
        let backoff = parse_or(&lookup, "EVENT_BUS_BACKOFF_MS", 100u64)?;
        config.retry = RetryPolicy::new(attempts, Duration::from_millis(backoff));
        config.send_timeout =
            Duration::from_millis(parse_or(&lookup, "EVENT_BUS_SEND_TIMEOUT_MS", 5000u64)?);

        Ok(config)
    }

    /// Returns a config with the broker step disabled.
    pub fn local_only() -> Self {
        Self::default()
    }

    /// Maps a domain topic to its broker topic.
    pub fn broker_topic<'a>(&'a self, topic: &'a str) -> &'a str {
        self.topics.get(topic).map(String::as_str).unwrap_or(topic)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}
