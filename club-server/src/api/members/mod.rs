//! Member API Module
//!
//! | Path | Method | Roles |
//! |------|--------|-------|
//! | /api/members | GET | all (members see only themselves) |
//! | /api/members | POST | admin, instructor |
//! | /api/members/{id} | GET | all (members: own id) |
//! | /api/members/{id} | PUT | admin, instructor |
//! | /api/members/{id} | DELETE | admin |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/members", get(handler::list).post(handler::create))
        .route(
            "/api/members/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
