//! Data models
//!
//! Shared between club-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod attendance;
pub mod dashboard;
pub mod member;
pub mod performance;
pub mod role;
pub mod user;

// Re-exports
pub use attendance::*;
pub use dashboard::*;
pub use member::*;
pub use performance::*;
pub use role::*;
pub use user::*;

use std::fmt;

/// A raw string that is not a member of one of the closed enumerations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Name of the enumeration, e.g. `"attendance status"`
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
    /// Accepted spellings
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', expected one of {}",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}
