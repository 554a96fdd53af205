//! Body and path extractors that reject with `AppError`
//!
//! axum's own `Json` and `Path` answer malformed input with plain text;
//! these wrappers keep every rejection in the `{code, message, details}`
//! shape with the offending field named.

use axum::Json;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

/// JSON request body
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Path parameters
#[derive(Debug, Clone, Copy)]
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ValidPath(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

/// Query string
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ValidQuery(value)),
            Err(QueryRejection::FailedToDeserializeQueryString(e)) => Err(
                AppError::with_code_for_field(ErrorCode::InvalidFormat, "query", e.body_text()),
            ),
            Err(other) => Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                other.body_text(),
            )),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => json_data_error(&e.body_text()),
        JsonRejection::JsonSyntaxError(e) => {
            AppError::with_code_for_field(ErrorCode::InvalidFormat, "body", e.body_text())
        }
        JsonRejection::MissingJsonContentType(_) => AppError::with_message(
            ErrorCode::InvalidRequest,
            "Expected request with `Content-Type: application/json`",
        ),
        other => AppError::with_message(ErrorCode::InvalidRequest, other.body_text()),
    }
}

/// Field and message from a deserialization failure text
///
/// The text reads `... target type: [path: ]message`, where a missing field
/// is reported as ``missing field `name` `` against its parent path.
fn json_data_error(text: &str) -> AppError {
    let detail = text
        .split_once("target type: ")
        .map_or(text, |(_, detail)| detail);
    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.contains(' ') => (Some(path), message),
        _ => (None, detail),
    };
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split_once('`'))
        .map(|(name, _)| name);

    match (path, missing) {
        (Some(parent), Some(name)) => AppError::with_code_for_field(
            ErrorCode::RequiredField,
            format!("{parent}.{name}"),
            "is required",
        ),
        (None, Some(name)) => {
            AppError::with_code_for_field(ErrorCode::RequiredField, name, "is required")
        }
        (Some(field), None) => AppError::invalid_field(field, message),
        (None, None) => AppError::with_message(ErrorCode::ValidationFailed, message),
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(e) => {
            let field = match e.kind() {
                ErrorKind::ParseErrorAtKey { key, .. }
                | ErrorKind::DeserializeError { key, .. }
                | ErrorKind::InvalidUtf8InPathParam { key } => key.clone(),
                _ => "path".to_string(),
            };
            AppError::with_code_for_field(ErrorCode::InvalidFormat, field, e.body_text())
        }
        other => AppError::with_message(ErrorCode::InvalidRequest, other.body_text()),
    }
}
