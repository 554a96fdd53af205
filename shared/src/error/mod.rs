//! Error codes and the error type shared by server and clients
//!
//! Code ranges:
//!
//! | Range | Category |
//! |-------|----------|
//! | 0xxx | general |
//! | 1xxx | authentication |
//! | 2xxx | permission |
//! | 3xxx | member |
//! | 4xxx | attendance |
//! | 5xxx | performance |
//! | 6xxx | account |
//! | 9xxx | system |
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::invalid_field("score", "must be between 0 and 100");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
