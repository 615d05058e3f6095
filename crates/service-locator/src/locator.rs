//! Mode-aware contract resolution.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use contracts::ContractId;

use crate::{
    Binding, Contract, LocatorConfig, LocatorError, LocatorMode, RemoteClient, Result,
};

type Handle = Box<dyn Any + Send + Sync>;

/// Where a contract resolves to under the current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Local,
    Remote { base_url: String },
}

/// Resolves contracts to in-process instances or remote clients.
///
/// Created once at startup and shared by every module.
pub struct ServiceLocator {
    config: LocatorConfig,
    http: reqwest::Client,
    local: RwLock<HashMap<ContractId, Handle>>,
    resolved: RwLock<HashMap<ContractId, Handle>>,
}

impl ServiceLocator {
    pub fn new(config: LocatorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.call.timeout)
            .build()
            .map_err(|e| LocatorError::HttpClient(e.to_string()))?;

        tracing::info!(mode = ?config.mode, "service locator created");

        Ok(Self {
            config,
            http,
            local: RwLock::new(HashMap::new()),
            resolved: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Registers the in-process implementation of a contract.
    pub fn bind_local<C: Contract>(&self, service: Arc<C::Service>) {
        tracing::debug!(contract = %C::ID, "local implementation bound");
        self.local
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(C::ID, Box::new(service));
    }

    /// Reports where a contract would resolve without building anything.
    pub fn plan(&self, contract: ContractId) -> Result<Resolution> {
        let route = self.config.route(contract);
        let binding = match self.config.mode {
            LocatorMode::Local => Binding::Local,
            LocatorMode::Remote => Binding::Remote,
            LocatorMode::Hybrid => route.binding,
        };

        match binding {
            Binding::Local => Ok(Resolution::Local),
            Binding::Remote => route
                .base_url
                .map(|base_url| Resolution::Remote { base_url })
                .ok_or(LocatorError::UnmappedContract(contract)),
        }
    }

    /// Returns the handle for a contract, building and caching it on first use.
    pub fn resolve<C: Contract>(&self) -> Result<Arc<C::Service>> {
        if let Some(handle) = self.cached::<C>() {
            return Ok(handle);
        }

        let (handle, binding) = match self.plan(C::ID)? {
            Resolution::Local => {
                let handle = self
                    .local
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(&C::ID)
                    .and_then(|h| h.downcast_ref::<Arc<C::Service>>())
                    .cloned()
                    .ok_or(LocatorError::UnboundContract(C::ID))?;
                (handle, "local")
            }
            Resolution::Remote { base_url } => {
                let client =
                    RemoteClient::new(C::ID, base_url, self.http.clone(), self.config.call.clone());
                (C::remote(client), "remote")
            }
        };

        metrics::counter!(
            "locator_resolutions_total",
            "contract" => C::ID.service_name(),
            "binding" => binding
        )
        .increment(1);
        tracing::debug!(contract = %C::ID, binding, "contract resolved");

        let mut resolved = self.resolved.write().unwrap_or_else(PoisonError::into_inner);
        let entry = resolved.entry(C::ID).or_insert_with(|| Box::new(handle.clone()) as Handle);
        Ok(entry
            .downcast_ref::<Arc<C::Service>>()
            .cloned()
            .unwrap_or(handle))
    }

    fn cached<C: Contract>(&self) -> Option<Arc<C::Service>> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&C::ID)
            .and_then(|h| h.downcast_ref::<Arc<C::Service>>())
            .cloned()
    }
}
