//! 认证与授权
//!
//! - [`JwtService`] - 令牌签发与验证
//! - [`CurrentUser`] - 已解析的调用者身份
//! - [`require_auth`] - 认证中间件
//! - [`policy`] - 角色/操作访问规则
//! - [`password`] - argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use policy::{Access, DenyReason, Operation, allow, authorize};
