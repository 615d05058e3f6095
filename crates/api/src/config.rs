//! Application configuration loaded from environment variables.

use std::collections::HashMap;

use contracts::ContractId;
use event_bus::EventBusConfig;
use service_locator::LocatorConfig;
use users::Pbkdf2Hasher;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `DATABASE_URL` — PostgreSQL for every module; unset means in-memory stores
/// - `{USERS,ORDERS,PAYMENTS,INVENTORY}_DATABASE_URL` — per-module override
/// - `SEED_CATALOG` — seed the default catalog and admin account (default: `true`)
/// - `CREDENTIAL_HASH_ROUNDS` — PBKDF2 rounds (default: `100000`)
///
/// plus the service locator and event bus variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub module_database_urls: HashMap<ContractId, String>,
    pub seed_catalog: bool,
    pub credential_rounds: u32,
    pub locator: LocatorConfig,
    pub event_bus: EventBusConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid value for PORT: {raw}"))?,
            None => defaults.port,
        };
        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };
        let seed_catalog = match lookup("SEED_CATALOG") {
            Some(raw) => parse_flag(&raw).ok_or(format!("invalid value for SEED_CATALOG: {raw}"))?,
            None => defaults.seed_catalog,
        };
        let credential_rounds = match lookup("CREDENTIAL_HASH_ROUNDS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid value for CREDENTIAL_HASH_ROUNDS: {raw}"))?,
            None => defaults.credential_rounds,
        };

        let module_database_urls = ContractId::ALL
            .into_iter()
            .filter_map(|contract| {
                let key = format!(
                    "{}_DATABASE_URL",
                    contract.service_name().to_ascii_uppercase()
                );
                non_empty(lookup(&key)).map(|url| (contract, url))
            })
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format,
            database_url: non_empty(lookup("DATABASE_URL")),
            module_database_urls,
            seed_catalog,
            credential_rounds,
            locator: LocatorConfig::from_lookup(&lookup)?,
            event_bus: EventBusConfig::from_lookup(&lookup)?,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the database URL of a module: its own override, then the shared URL.
    pub fn database_url_for(&self, contract: ContractId) -> Option<&str> {
        self.module_database_urls
            .get(&contract)
            .or(self.database_url.as_ref())
            .map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            module_database_urls: HashMap::new(),
            seed_catalog: true,
            credential_rounds: Pbkdf2Hasher::DEFAULT_ROUNDS,
            locator: LocatorConfig::local(),
            event_bus: EventBusConfig::local_only(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_bus::BusMode;
    use service_locator::LocatorMode;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.seed_catalog);
        assert!(config.database_url.is_none());
        assert_eq!(config.locator.mode, LocatorMode::Local);
        assert_eq!(config.event_bus.mode, BusMode::LocalOnly);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_empty_lookup_matches_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert!(config.seed_catalog);
        assert_eq!(config.credential_rounds, Pbkdf2Hasher::DEFAULT_ROUNDS);
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("SEED_CATALOG", "false"),
            ("CREDENTIAL_HASH_ROUNDS", "1000"),
            ("SERVICE_LOCATOR_MODE", "microservices"),
            ("EVENT_BUS_MODE", "kafka"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.seed_catalog);
        assert_eq!(config.credential_rounds, 1000);
        assert_eq!(config.locator.mode, LocatorMode::Remote);
        assert_eq!(config.event_bus.mode, BusMode::External);
    }

    #[test]
    fn test_database_url_fallback() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://shared"),
            ("ORDERS_DATABASE_URL", "postgres://orders"),
            ("USERS_DATABASE_URL", "  "),
        ]))
        .unwrap();

        assert_eq!(
            config.database_url_for(ContractId::Orders),
            Some("postgres://orders")
        );
        assert_eq!(
            config.database_url_for(ContractId::Users),
            Some("postgres://shared")
        );
        assert_eq!(Config::default().database_url_for(ContractId::Users), None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SEED_CATALOG", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("SERVICE_LOCATOR_MODE", "p2p")])).is_err());
    }
}
