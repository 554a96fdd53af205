//! CurrentUser extractor
//!
//! Handlers take [`CurrentUser`] as an argument; the identity comes from the
//! request extensions when `require_auth` already ran, otherwise the bearer
//! token is verified here.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user = authenticate(state.jwt_service(), auth_header, parts.uri.path())?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Resolve the identity carried by an Authorization header value
pub(crate) fn authenticate(
    jwt_service: &JwtService,
    auth_header: Option<&str>,
    path: &str,
) -> Result<CurrentUser, AppError> {
    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = path.to_string());
            return Err(AppError::unauthorized());
        }
    };

    jwt_service.resolve(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = path.to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::MalformedClaims(msg) => {
                AppError::invalid_token(format!("Malformed JWT claims: {msg}"))
            }
            _ => AppError::invalid_token("Invalid token"),
        }
    })
}
