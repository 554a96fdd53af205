//! Auth API Handlers

use axum::{Json, extract::State};
use shared::error::AppResult;
use shared::models::{LoginRequest, LoginResponse, UserInfo};

use crate::api::extract::ValidJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::auth;

/// Exchange credentials for a token
pub async fn login(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = auth::login(&state.pool, state.jwt_service(), payload).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    Ok(Json(auth::me(&state.pool, &user).await?))
}
