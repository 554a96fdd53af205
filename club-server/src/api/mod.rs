//! API routes
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - login and current identity
//! - [`members`] - member registry
//! - [`attendance`] - daily attendance
//! - [`performance`] - performance evaluations
//! - [`dashboard`] - club-wide summary
//! - [`extract`] - extractors rejecting with `AppError`

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod members;
pub mod performance;
