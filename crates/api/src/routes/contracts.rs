//! Contract endpoints: the server side of the network adapter.
//!
//! `POST /contracts/{service}/api/{method}` with `{"arguments": ...}` calls
//! `method` on this process's own implementation of the contract. Success
//! answers with the return value; failure answers with a
//! [`contracts::wire::Fault`] so the caller can rebuild the typed error.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use contracts::wire::CallEnvelope;
use contracts::{
    ContractError, ContractId, InventoryService, OrderService, PaymentService, Result,
    UserService,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bootstrap::AppState;
use crate::error::FaultResponse;

/// POST /contracts/{service}/api/{method}
#[tracing::instrument(skip(state, envelope))]
pub async fn call(
    State(state): State<Arc<AppState>>,
    Path((service, method)): Path<(String, String)>,
    Json(envelope): Json<CallEnvelope<Value>>,
) -> Response {
    // No fault body: a wrong base URL is a routing failure, not a business error.
    let Ok(contract) = service.parse::<ContractId>() else {
        tracing::warn!(%service, "call for an unknown contract");
        return StatusCode::NOT_FOUND.into_response();
    };

    let arguments = envelope.arguments;
    let local = &state.local;
    let result = match contract {
        ContractId::Users => dispatch_users(local.users.as_ref(), &method, arguments).await,
        ContractId::Orders => dispatch_orders(local.orders.as_ref(), &method, arguments).await,
        ContractId::Payments => {
            dispatch_payments(local.payments.as_ref(), &method, arguments).await
        }
        ContractId::Inventory => {
            dispatch_inventory(local.inventory.as_ref(), &method, arguments).await
        }
    };

    match result {
        Ok(value) => Json(value).into_response(),
        Err(err) => {
            tracing::debug!(contract = %contract, method = %method, error = %err, "contract call failed");
            FaultResponse(err).into_response()
        }
    }
}

fn args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments)
        .map_err(|e| ContractError::validation(format!("invalid arguments: {e}")))
}

fn reply<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(ContractError::storage)
}

fn unknown_method(contract: ContractId, method: &str) -> ContractError {
    ContractError::not_found("Method", format!("{contract}.{method}"))
}

async fn dispatch_users(service: &dyn UserService, method: &str, arguments: Value) -> Result<Value> {
    use contracts::v1::users::{CreateArgs, UserIdArgs, methods};

    match method {
        methods::LIST => reply(service.list().await?),
        methods::CREATE => {
            let CreateArgs { user } = args(arguments)?;
            reply(service.create(user).await?)
        }
        methods::FIND => {
            let UserIdArgs { user_id } = args(arguments)?;
            reply(service.find(user_id).await?)
        }
        other => Err(unknown_method(ContractId::Users, other)),
    }
}

async fn dispatch_orders(
    service: &dyn OrderService,
    method: &str,
    arguments: Value,
) -> Result<Value> {
    use contracts::v1::orders::{CreateArgs, CreateFromUserArgs, OrderIdArgs, methods};

    match method {
        methods::LIST => reply(service.list().await?),
        methods::CREATE => {
            let CreateArgs { order } = args(arguments)?;
            reply(service.create(order).await?)
        }
        methods::CREATE_FROM_USER => {
            let CreateFromUserArgs { user } = args(arguments)?;
            reply(service.create_from_user(user).await?)
        }
        methods::MARK_AS_PAID => {
            let OrderIdArgs { order_id } = args(arguments)?;
            reply(service.mark_as_paid(order_id).await?)
        }
        methods::FIND => {
            let OrderIdArgs { order_id } = args(arguments)?;
            reply(service.find(order_id).await?)
        }
        other => Err(unknown_method(ContractId::Orders, other)),
    }
}

async fn dispatch_payments(
    service: &dyn PaymentService,
    method: &str,
    arguments: Value,
) -> Result<Value> {
    use contracts::v1::payments::{OrderIdArgs, PaymentIdArgs, ProcessArgs, methods};

    match method {
        methods::LIST => reply(service.list().await?),
        methods::PROCESS => {
            let ProcessArgs { payment } = args(arguments)?;
            reply(service.process(payment).await?)
        }
        methods::COMPLETE => {
            let PaymentIdArgs { payment_id } = args(arguments)?;
            reply(service.complete(payment_id).await?)
        }
        methods::FIND => {
            let PaymentIdArgs { payment_id } = args(arguments)?;
            reply(service.find(payment_id).await?)
        }
        methods::FIND_BY_ORDER => {
            let OrderIdArgs { order_id } = args(arguments)?;
            reply(service.find_by_order(order_id).await?)
        }
        other => Err(unknown_method(ContractId::Payments, other)),
    }
}

async fn dispatch_inventory(
    service: &dyn InventoryService,
    method: &str,
    arguments: Value,
) -> Result<Value> {
    use contracts::v1::inventory::{CreateProductArgs, SkuArgs, StockArgs, methods};

    match method {
        methods::ALL => reply(service.all().await?),
        methods::FIND_BY_SKU => {
            let SkuArgs { sku } = args(arguments)?;
            reply(service.find_by_sku(&sku).await?)
        }
        methods::CREATE_PRODUCT => {
            let CreateProductArgs { product } = args(arguments)?;
            reply(service.create_product(product).await?)
        }
        methods::RESERVE => {
            let StockArgs { sku, quantity } = args(arguments)?;
            reply(service.reserve(&sku, quantity).await?)
        }
        methods::RELEASE => {
            let StockArgs { sku, quantity } = args(arguments)?;
            reply(service.release(&sku, quantity).await?)
        }
        other => Err(unknown_method(ContractId::Inventory, other)),
    }
}
