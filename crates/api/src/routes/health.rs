//! Health check endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use contracts::ContractId;
use event_bus::BusMode;
use serde::Serialize;
use service_locator::Resolution;

use crate::bootstrap::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub event_bus: &'static str,
    /// Where each contract resolves: `local` or the remote base URL.
    pub contracts: BTreeMap<&'static str, String>,
}

/// GET /health — returns system health status and the current wiring.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let contracts = ContractId::ALL
        .into_iter()
        .map(|contract| {
            let resolution = match state.locator.plan(contract) {
                Ok(Resolution::Local) => "local".to_string(),
                Ok(Resolution::Remote { base_url }) => base_url,
                Err(err) => err.to_string(),
            };
            (contract.service_name(), resolution)
        })
        .collect();

    let event_bus = match state.events.config().mode {
        BusMode::LocalOnly => "local",
        BusMode::External => "kafka",
    };

    Json(HealthResponse {
        status: "ok",
        event_bus,
        contracts,
    })
}
