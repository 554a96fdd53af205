//! Attendance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/attendance", get(handler::list))
        .route("/api/attendance/bulk", post(handler::bulk_upsert))
        .route("/api/attendance/member/{member_id}", get(handler::list_for_member))
}
