//! Performance API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/performance", get(handler::list).post(handler::create))
        .route("/api/performance/member/{member_id}", get(handler::list_for_member))
}
