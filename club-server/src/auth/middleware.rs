//! 认证中间件
//!
//! 校验每个 `/api/` 请求的 `Authorization: Bearer <token>`，
//! 并把解析出的 [`CurrentUser`] 存入请求扩展。
//!
//! # 跳过的路径
//!
//! - `OPTIONS *` (CORS 预检)
//! - 非 `/api/` 路径 (health，未知路由落到 404)
//! - `/api/auth/login`
//!
//! # 错误
//!
//! | 情况 | 状态 |
//! |------|--------|
//! | 缺少 Authorization 头 | 401 NotAuthenticated |
//! | 令牌过期 | 401 TokenExpired |
//! | 令牌或 claims 无效 | 401 TokenInvalid |

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use crate::auth::extractor::authenticate;
use crate::core::ServerState;

/// `/api/` 下无需令牌的路径
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login"];

pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = authenticate(state.jwt_service(), auth_header, path)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
