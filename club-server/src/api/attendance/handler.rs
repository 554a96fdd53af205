//! Attendance API Handlers

use axum::{
    Json,
    extract::State,
};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::{
    AttendanceQuery, AttendanceRecord, AttendanceWithMember, BulkAttendanceRequest,
};

use crate::api::extract::{ValidJson, ValidPath, ValidQuery};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::attendance;

#[derive(Serialize)]
pub struct AttendanceBody<T> {
    attendance: Vec<T>,
}

/// Records for `?date=` (all days when absent)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidQuery(query): ValidQuery<AttendanceQuery>,
) -> AppResult<Json<AttendanceBody<AttendanceWithMember>>> {
    let attendance = attendance::list(&state.pool, &user, state.config.timezone, query).await?;
    Ok(Json(AttendanceBody { attendance }))
}

pub async fn list_for_member(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidPath(member_id): ValidPath<i64>,
) -> AppResult<Json<AttendanceBody<AttendanceRecord>>> {
    let attendance = attendance::list_for_member(&state.pool, &user, member_id).await?;
    Ok(Json(AttendanceBody { attendance }))
}

/// Upsert a batch; the stored rows come back
pub async fn bulk_upsert(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(payload): ValidJson<BulkAttendanceRequest>,
) -> AppResult<Json<AttendanceBody<AttendanceRecord>>> {
    let attendance =
        attendance::bulk_upsert(&state.pool, &user, state.config.timezone, payload).await?;
    Ok(Json(AttendanceBody { attendance }))
}
