//! Dashboard API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use shared::error::AppResult;
use shared::models::DashboardSummary;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::dashboard;

#[derive(Serialize)]
pub struct SummaryBody {
    summary: DashboardSummary,
}

pub async fn summary(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SummaryBody>> {
    let summary = dashboard::summary(&state.pool, &user, &state.config).await?;
    Ok(Json(SummaryBody { summary }))
}
