//! Member API Handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::{
    Member, MemberCreate, MemberDetail, MemberQuery, MemberUpdate, MemberWithSummary,
};

use crate::api::extract::{ValidJson, ValidPath, ValidQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::members;

#[derive(Serialize)]
pub struct MembersBody {
    members: Vec<MemberWithSummary>,
}

#[derive(Serialize)]
pub struct MemberBody<T> {
    member: T,
}

/// List members visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidQuery(query): ValidQuery<MemberQuery>,
) -> AppResult<Json<MembersBody>> {
    let members = members::list(&state.pool, &user, query).await?;
    Ok(Json(MembersBody { members }))
}

/// Member with summaries and recent records
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<Json<MemberBody<MemberDetail>>> {
    let member = members::get(&state.pool, &user, id).await?;
    Ok(Json(MemberBody { member }))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<MemberCreate>,
) -> AppResult<(StatusCode, Json<MemberBody<Member>>)> {
    let member = members::create(&state.pool, &user, state.config.timezone, payload).await?;
    Ok((StatusCode::CREATED, Json(MemberBody { member })))
}

pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(payload): ValidJson<MemberUpdate>,
) -> AppResult<Json<MemberBody<Member>>> {
    let member = members::update(&state.pool, &user, state.config.timezone, id, payload).await?;
    Ok(Json(MemberBody { member }))
}

pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> AppResult<StatusCode> {
    members::delete(&state.pool, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
