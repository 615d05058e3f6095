//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserId;
use contracts::{NewUser, UserDto};

use super::parse_id;
use crate::bootstrap::AppState;
use crate::error::ApiError;

/// POST /users — register a user; triggers the welcome order.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state.services.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserDto>>, ApiError> {
    Ok(Json(state.services.users.list().await?))
}

#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user_id: UserId = parse_id(&id)?;
    Ok(Json(state.services.users.find(user_id).await?))
}
