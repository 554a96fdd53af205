//! Performance API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::{PerformanceCreate, PerformanceQuery, PerformanceRecord, PerformanceWithMember};

use crate::api::extract::{ValidJson, ValidPath, ValidQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::performance;

#[derive(Serialize)]
pub struct PerformanceBody<T> {
    performance: T,
}

pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidQuery(query): ValidQuery<PerformanceQuery>,
) -> AppResult<Json<PerformanceBody<Vec<PerformanceWithMember>>>> {
    let performance = performance::list(&state.pool, &user, query).await?;
    Ok(Json(PerformanceBody { performance }))
}

pub async fn list_for_member(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidPath(member_id): ValidPath<i64>,
) -> AppResult<Json<PerformanceBody<Vec<PerformanceRecord>>>> {
    let performance = performance::list_for_member(&state.pool, &user, member_id).await?;
    Ok(Json(PerformanceBody { performance }))
}

/// Record one evaluation
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<PerformanceCreate>,
) -> AppResult<(StatusCode, Json<PerformanceBody<PerformanceRecord>>)> {
    let performance =
        performance::create(&state.pool, &user, state.config.timezone, payload).await?;
    Ok((StatusCode::CREATED, Json(PerformanceBody { performance })))
}
