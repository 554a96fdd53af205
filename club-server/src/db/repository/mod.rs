//! Repository Module
//!
//! Free functions over `&SqlitePool` (or an open transaction) per table.

pub mod attendance;
pub mod member;
pub mod performance;
pub mod user;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Lock contention that outlasted the busy timeout
    #[error("Database busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// SQLite primary result codes for lock contention (SQLITE_BUSY, SQLITE_LOCKED)
/// and their extended forms
const BUSY_CODES: &[&str] = &["5", "6", "261", "262", "517"];

/// Is this a lock-contention error worth retrying
pub(crate) fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .is_some_and(|code| BUSY_CODES.iter().any(|c| *c == code)),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if is_busy(&err) {
            return RepoError::Busy(err.to_string());
        }
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    RepoError::Duplicate(db.message().to_string())
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    RepoError::ForeignKey(db.message().to_string())
                }
                _ => RepoError::Database(err.to_string()),
            },
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::ForeignKey(msg) => {
                AppError::with_message(ErrorCode::NotFound, format!("Referenced record not found: {msg}"))
            }
            RepoError::Busy(msg) => AppError::transaction_failed(format!("Database busy: {msg}")),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
