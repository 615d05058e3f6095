//! Payment endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::PaymentId;
use contracts::{NewPayment, PaymentDto};

use super::parse_id;
use crate::bootstrap::AppState;
use crate::error::ApiError;

/// POST /payments — charge an order. Answers with the completed payment.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPayment>,
) -> Result<(StatusCode, Json<PaymentDto>), ApiError> {
    let payment = state.services.payments.process(req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PaymentDto>>, ApiError> {
    Ok(Json(state.services.payments.list().await?))
}

#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentDto>, ApiError> {
    let payment_id: PaymentId = parse_id(&id)?;
    Ok(Json(state.services.payments.find(payment_id).await?))
}
