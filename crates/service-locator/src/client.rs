//! HTTP transport shared by the typed remote adapters.

use std::time::Instant;

use contracts::wire::{CallEnvelope, Fault, method_path};
use contracts::{ContractError, ContractId, RemoteCallError, RemoteFailure};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CallPolicy;

/// Calls one module's contract endpoints.
///
/// Every method invocation is `POST {base_url}/api/{method}` with body
/// `{"arguments": ...}`.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    contract: ContractId,
    base_url: String,
    http: reqwest::Client,
    policy: CallPolicy,
}

impl RemoteClient {
    pub fn new(
        contract: ContractId,
        base_url: impl Into<String>,
        http: reqwest::Client,
        policy: CallPolicy,
    ) -> Self {
        Self {
            contract,
            base_url: base_url.into(),
            http,
            policy,
        }
    }

    pub fn contract(&self) -> ContractId {
        self.contract
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invokes a contract method and decodes its result.
    ///
    /// Business errors sent back by the remote module are returned as-is.
    /// Anything else that goes wrong becomes [`ContractError::RemoteCall`].
    #[tracing::instrument(skip(self, arguments), fields(contract = %self.contract))]
    pub async fn call<A, R>(&self, method: &str, arguments: &A) -> contracts::Result<R>
    where
        A: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, method_path(method));
        let retry = &self.policy.retry;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let started = Instant::now();
            let result = self.call_once(&url, method, arguments).await;

            metrics::histogram!(
                "remote_call_duration_seconds",
                "contract" => self.contract.service_name(),
                "method" => method.to_string()
            )
            .record(started.elapsed().as_secs_f64());
            metrics::counter!(
                "remote_calls_total",
                "contract" => self.contract.service_name(),
                "method" => method.to_string(),
                "outcome" => outcome(&result)
            )
            .increment(1);

            match result {
                Err(ContractError::RemoteCall(err)) if retry.should_retry(attempt) => {
                    let delay = retry.delay_after(attempt);
                    tracing::warn!(%url, attempt, error = %err, "remote call failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(ContractError::RemoteCall(err)) => {
                    tracing::error!(
                        service = self.contract.service_name(),
                        method,
                        %url,
                        reason = %err.reason,
                        "service call failed"
                    );
                    return Err(ContractError::RemoteCall(err));
                }
                other => return other,
            }
        }
    }

    async fn call_once<A, R>(&self, url: &str, method: &str, arguments: &A) -> contracts::Result<R>
    where
        A: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .timeout(self.policy.timeout)
            .json(&CallEnvelope::new(arguments))
            .send()
            .await
            .map_err(|e| self.failure(url, method, classify(&e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<R>()
                .await
                .map_err(|e| self.failure(url, method, RemoteFailure::Decode(e.to_string())));
        }

        let body = response.bytes().await.unwrap_or_default();
        if let Ok(fault) = serde_json::from_slice::<Fault>(&body) {
            if fault.error.is_business() {
                return Err(fault.error);
            }
        }

        Err(self.failure(url, method, RemoteFailure::Status(status.as_u16())))
    }

    fn failure(&self, url: &str, method: &str, reason: RemoteFailure) -> ContractError {
        ContractError::RemoteCall(RemoteCallError {
            contract: self.contract.name().to_string(),
            method: method.to_string(),
            url: url.to_string(),
            reason,
        })
    }
}

fn classify(err: &reqwest::Error) -> RemoteFailure {
    if err.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Transport(err.to_string())
    }
}

fn outcome<R>(result: &contracts::Result<R>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(err) if err.is_business() => "business_error",
        Err(_) => "failure",
    }
}
