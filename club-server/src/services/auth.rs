//! Login, identity and bootstrap account

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, Role, User, UserInfo};
use sqlx::SqlitePool;

use crate::auth::password::{hash_password, verify_dummy_password, verify_password};
use crate::auth::{CurrentUser, JwtService};
use crate::core::BootstrapAdmin;
use crate::db::repository::{RepoError, member, user};
use crate::security_log;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_email, validate_required_text,
};

/// Verify credentials and issue a token
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    pool: &SqlitePool,
    jwt_service: &JwtService,
    request: LoginRequest,
) -> AppResult<LoginResponse> {
    validate_required_text(&request.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&request.password, "password", MAX_PASSWORD_LEN)?;

    let email = request.email.trim();
    let verified = match user::find_by_email(pool, email).await? {
        Some(account) => {
            verify_password(&request.password, &account.password_hash).then_some(account)
        }
        None => {
            verify_dummy_password(&request.password);
            None
        }
    };
    let account = match verified {
        Some(account) => account,
        None => {
            security_log!("WARN", "login_failed", email = email.to_string());
            return Err(AppError::invalid_credentials());
        }
    };

    let identity = identity_of(&account);
    let token = jwt_service
        .generate_token(&identity)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;

    security_log!(
        "INFO",
        "login_success",
        user_id = account.id,
        role = account.role.as_str()
    );

    Ok(LoginResponse {
        token,
        user: user_info(pool, account).await?,
    })
}

/// Account behind the current token
pub async fn me(pool: &SqlitePool, current: &CurrentUser) -> AppResult<UserInfo> {
    let account = user::find_by_id(pool, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    user_info(pool, account).await
}

/// Create the first admin account when no accounts exist
///
/// Returns `true` when an account was created.
pub async fn bootstrap_admin(pool: &SqlitePool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if user::count(pool).await? > 0 {
        return Ok(false);
    }
    create_account(pool, &admin.email, &admin.password, Role::Admin, None).await?;
    tracing::info!(email = %admin.email, "Bootstrap admin account created");
    Ok(true)
}

/// Create a login account
pub async fn create_account(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    role: Role,
    member_id: Option<i64>,
) -> AppResult<User> {
    validate_email(email, "email")?;
    validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    let hash = hash_password(password)?;
    user::create(pool, email.trim(), &hash, role, member_id)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::with_code_for_field(
                ErrorCode::UserEmailExists,
                "email",
                "an account with this email already exists",
            ),
            RepoError::ForeignKey(_) => AppError::invalid_field("memberId", "member does not exist"),
            other => other.into(),
        })
}

fn identity_of(account: &User) -> CurrentUser {
    CurrentUser {
        id: account.id,
        email: account.email.clone(),
        role: account.role,
        member_id: account.member_id,
    }
}

async fn user_info(pool: &SqlitePool, account: User) -> AppResult<UserInfo> {
    let member = match account.member_id {
        Some(id) => member::find_by_id(pool, id).await?,
        None => None,
    };
    Ok(UserInfo {
        id: account.id,
        email: account.email,
        role: account.role,
        member_id: account.member_id,
        member,
    })
}
