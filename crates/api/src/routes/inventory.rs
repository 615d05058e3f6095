//! Catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use contracts::{NewProduct, ProductDto};

use crate::bootstrap::AppState;
use crate::error::ApiError;

/// GET /inventory — the catalog ordered by name.
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ProductDto>>, ApiError> {
    Ok(Json(state.services.inventory.all().await?))
}

/// POST /inventory — add a product.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let product = state.services.inventory.create_product(req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
