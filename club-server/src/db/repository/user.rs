//! Login account Repository

use super::RepoResult;
use shared::models::{Role, User};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, email, password_hash, role, member_id, created_at FROM app_user";

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{} WHERE email = ? COLLATE NOCASE", USER_SELECT);
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{} WHERE id = ?", USER_SELECT);
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM app_user")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    role: Role,
    member_id: Option<i64>,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO app_user (email, password_hash, role, member_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING id, email, password_hash, role, member_id, created_at",
    )
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(member_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::RepoError;
    use crate::db::repository::test_support::{insert_member, test_pool};

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let user = create(&pool, "Coach@Club.org", "hash", Role::Instructor, None)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Instructor);
        let found = find_by_email(&pool, "coach@club.org").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(find_by_id(&pool, user.id).await.unwrap().is_some());
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let pool = test_pool().await;
        create(&pool, "a@club.org", "h", Role::Admin, None).await.unwrap();
        let err = create(&pool, "a@club.org", "h", Role::Admin, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_member_delete_unlinks_account() {
        let pool = test_pool().await;
        insert_member(&pool, 3, "VIN-003", "Ada").await;
        let user = create(&pool, "ada@club.org", "h", Role::Member, Some(3))
            .await
            .unwrap();
        crate::db::repository::member::delete(&pool, 3).await.unwrap();
        let user = find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(user.member_id, None);
    }
}
