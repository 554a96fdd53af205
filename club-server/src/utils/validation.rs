//! Input validation helpers
//!
//! Every value crossing the HTTP boundary is checked here before any storage
//! access. Errors carry the offending field name.

use std::ops::RangeInclusive;
use std::str::FromStr;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::UnknownVariant;

// ── Text length limits ──────────────────────────────────────────────

/// Person names, department, batch, position, status label
pub const MAX_NAME_LEN: usize = 200;

/// Notes and free-text skills
pub const MAX_NOTE_LEN: usize = 2000;

/// Phone numbers and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Upper bound on entries in one bulk attendance request
pub const MAX_BULK_ENTRIES: usize = 1000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::with_code_for_field(
            ErrorCode::RequiredField,
            field,
            "must not be empty",
        ));
    }
    if value.chars().count() > max_len {
        return Err(AppError::invalid_field(
            field,
            format!("is too long ({} chars, max {max_len})", value.chars().count()),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::invalid_field(
            field,
            format!("is too long ({} chars, max {max_len})", v.chars().count()),
        ));
    }
    Ok(())
}

/// Minimal shape check: one `@` with text on both sides and a dot in the domain
pub fn validate_email(value: &str, field: &str) -> AppResult<()> {
    validate_required_text(value, field, MAX_EMAIL_LEN)?;
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::with_code_for_field(
            ErrorCode::InvalidFormat,
            field,
            "is not a valid email address",
        ));
    }
    Ok(())
}

/// Validate an integer against an inclusive range, reporting `code` on failure
pub fn validate_range(
    value: i64,
    range: RangeInclusive<i64>,
    field: &str,
    code: ErrorCode,
) -> AppResult<()> {
    if !range.contains(&value) {
        return Err(AppError::with_code_for_field(
            code,
            field,
            format!(
                "must be between {} and {} (got {value})",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

/// Parse one of the closed enumerations, reporting `code` against `field`
pub fn parse_enum<T>(value: &str, field: &str, code: ErrorCode) -> AppResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse::<T>().map_err(|e| {
        AppError::with_code_for_field(code, field, e.to_string())
            .with_detail("expected", e.expected.to_vec())
    })
}
