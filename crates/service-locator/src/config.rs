//! Locator configuration.

use std::collections::HashMap;
use std::time::Duration;

use common::RetryPolicy;
use contracts::ContractId;

/// Process-wide resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocatorMode {
    /// Every contract resolves to its in-process instance.
    #[default]
    Local,
    /// Every contract resolves to a network client.
    Remote,
    /// Each contract follows its own [`Binding`].
    Hybrid,
}

impl std::str::FromStr for LocatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "monolith" => Ok(LocatorMode::Local),
            "remote" | "http" | "microservices" => Ok(LocatorMode::Remote),
            "hybrid" => Ok(LocatorMode::Hybrid),
            other => Err(format!("unknown service locator mode: {other}")),
        }
    }
}

/// Per-contract choice used in hybrid mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Binding {
    #[default]
    Local,
    Remote,
}

impl std::str::FromStr for Binding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Binding::Local),
            "remote" | "http" => Ok(Binding::Remote),
            other => Err(format!("unknown service binding: {other}")),
        }
    }
}

/// Routing entry for one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRoute {
    pub binding: Binding,
    /// Base URL of the module's contract endpoints, without trailing slash.
    pub base_url: Option<String>,
}

/// Policy applied to every remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Attempts for infrastructure failures. Business errors are never retried.
    pub retry: RetryPolicy,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::no_retry(),
        }
    }
}

/// Service locator settings.
///
/// Reads from environment variables:
/// - `SERVICE_LOCATOR_MODE` — `local`, `remote` (aliases `http`, `microservices`)
///   or `hybrid` (default: `local`)
/// - `SERVICE_{USERS,ORDERS,PAYMENTS,INVENTORY}_MODE` — `local` or `remote`
/// - `SERVICE_{USERS,ORDERS,PAYMENTS,INVENTORY}_URL` — remote base URL
/// - `SERVICE_CALL_TIMEOUT_MS` (default: `5000`)
/// - `SERVICE_CALL_MAX_ATTEMPTS` (default: `1`)
/// - `SERVICE_CALL_BACKOFF_MS` (default: `100`)
#[derive(Debug, Clone, Default)]
pub struct LocatorConfig {
    pub mode: LocatorMode,
    pub routes: HashMap<ContractId, ContractRoute>,
    pub call: CallPolicy,
}

impl LocatorConfig {
    /// All-local configuration.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: LocatorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the route of one contract.
    pub fn with_route(
        mut self,
        contract: ContractId,
        binding: Binding,
        base_url: Option<&str>,
    ) -> Self {
        self.routes.insert(
            contract,
            ContractRoute {
                binding,
                base_url: base_url.map(normalize_url),
            },
        );
        self
    }

    pub fn with_call_policy(mut self, call: CallPolicy) -> Self {
        self.call = call;
        self
    }

    /// Returns the route of a contract, or the default local route.
    pub fn route(&self, contract: ContractId) -> ContractRoute {
        self.routes.get(&contract).cloned().unwrap_or_default()
    }

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

        if let Some(mode) = lookup("SERVICE_LOCATOR_MODE") {
            config.mode = mode.parse()?;
        }

        for contract in ContractId::ALL {
            let prefix = format!("SERVICE_{}", contract.service_name().to_ascii_uppercase());
            let binding = match lookup(&format!("{prefix}_MODE")) {
                Some(raw) => raw.parse()?,
                None => Binding::Local,
            };
            let base_url = lookup(&format!("{prefix}_URL"))
                .filter(|url| !url.trim().is_empty())
                .map(|url| normalize_url(&url));
            if binding != Binding::Local || base_url.is_some() {
                config
                    .routes
                    .insert(contract, ContractRoute { binding, base_url });
            }
        }

        let timeout_ms = parse_or(&lookup, "SERVICE_CALL_TIMEOUT_MS", 5000u64)?;
        let attempts = parse_or(&lookup, "SERVICE_CALL_MAX_ATTEMPTS", 1u32)?;
        let backoff_ms = parse_or(&lookup, "SERVICE_CALL_BACKOFF_MS", 100u64)?;
        config.call = CallPolicy {
            timeout: Duration::from_millis(timeout_ms),
            retry: RetryPolicy::new(attempts, Duration::from_millis(backoff_ms)),
        };

        Ok(config)
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
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
