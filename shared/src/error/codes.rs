//! Unified error codes for the club server
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member errors
//! - 4xxx: Attendance errors
//! - 5xxx: Performance errors
//! - 6xxx: Account errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Atomic batch was rolled back
    TransactionFailed = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Member role without a linked member profile
    MemberNotLinked = 2006,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Member email already exists
    MemberEmailExists = 3002,
    /// Could not allocate a member identifier
    VinAllocationFailed = 3003,

    // ==================== 4xxx: Attendance ====================
    /// Bulk attendance request without records
    AttendanceBatchEmpty = 4001,
    /// Attendance status outside the fixed set
    InvalidAttendanceStatus = 4002,

    // ==================== 5xxx: Performance ====================
    /// Performance category outside the fixed set
    InvalidPerformanceCategory = 5001,
    /// Score outside 0..=100
    ScoreOutOfRange = 5002,
    /// Rating outside 1..=10
    RatingOutOfRange = 5003,

    // ==================== 6xxx: Account ====================
    /// Login account not found
    UserNotFound = 6001,
    /// Login email already exists
    UserEmailExists = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TransactionFailed => "Transaction failed and was rolled back",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::MemberNotLinked => "Member profile not linked",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::MemberEmailExists => "Member email already exists",
            ErrorCode::VinAllocationFailed => "Could not allocate a member identifier",

            // Attendance
            ErrorCode::AttendanceBatchEmpty => "Attendance batch must not be empty",
            ErrorCode::InvalidAttendanceStatus => "Invalid attendance status",

            // Performance
            ErrorCode::InvalidPerformanceCategory => "Invalid performance category",
            ErrorCode::ScoreOutOfRange => "Score must be between 0 and 100",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 10",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailExists => "User email already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,
            9 => ErrorCode::TransactionFailed,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,

            2001 => ErrorCode::PermissionDenied,
            2003 => ErrorCode::AdminRequired,
            2006 => ErrorCode::MemberNotLinked,

            3001 => ErrorCode::MemberNotFound,
            3002 => ErrorCode::MemberEmailExists,
            3003 => ErrorCode::VinAllocationFailed,

            4001 => ErrorCode::AttendanceBatchEmpty,
            4002 => ErrorCode::InvalidAttendanceStatus,

            5001 => ErrorCode::InvalidPerformanceCategory,
            5002 => ErrorCode::ScoreOutOfRange,
            5003 => ErrorCode::RatingOutOfRange,

            6001 => ErrorCode::UserNotFound,
            6002 => ErrorCode::UserEmailExists,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9005 => ErrorCode::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
