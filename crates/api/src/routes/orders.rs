//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{OrderId, UserId};
use contracts::{NewOrder, OrderDto};
use serde::Deserialize;

use super::parse_id;
use crate::bootstrap::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub product_sku: String,
    pub quantity: u32,
}

/// POST /orders — reserve stock and place a pending order.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDto>), ApiError> {
    let order = state
        .services
        .orders
        .create(NewOrder {
            user_id: req.user_id,
            product_sku: req.product_sku,
            quantity: req.quantity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — latest first.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<OrderDto>>, ApiError> {
    Ok(Json(state.services.orders.list().await?))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDto>, ApiError> {
    let order_id: OrderId = parse_id(&id)?;
    Ok(Json(state.services.orders.find(order_id).await?))
}
