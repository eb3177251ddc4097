//! Login streak and profile endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{ActivityRecord, LoginOutcome, UserProfile};
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// `POST /v1/users/:user_id/login`
pub async fn login(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LoginOutcome>> {
    Ok(Json(state.studio.record_login(&user_id).await?))
}

/// `GET /v1/users/:user_id/profile`
pub async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>> {
    state
        .studio
        .profile(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no profile for user {}", user_id)))
}

/// `GET /v1/users/:user_id/activity?limit=N`
pub async fn activity(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRecord>>> {
    Ok(Json(state.studio.activity(&user_id, query.limit).await?))
}
