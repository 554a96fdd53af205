//! Shared types for the club server
//!
//! Wire types used by the server and its clients: the unified error system,
//! domain models and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
