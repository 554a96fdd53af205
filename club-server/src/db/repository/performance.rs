//! Performance Repository (append-only)

use super::{RepoError, RepoResult};
use shared::models::{PerformanceCategory, PerformanceRecord};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PERFORMANCE_SELECT: &str = "SELECT id, member_id, category, score, rating, notes, recorded_at, created_at FROM performance_record";

/// Validated performance entry
#[derive(Debug, Clone)]
pub struct NewPerformance {
    pub member_id: i64,
    pub category: PerformanceCategory,
    pub score: i64,
    pub rating: i64,
    pub notes: Option<String>,
    pub recorded_at: i64,
}

/// Records of one category, or all records; newest first
pub async fn find_by_category(
    pool: &SqlitePool,
    category: Option<PerformanceCategory>,
) -> RepoResult<Vec<PerformanceRecord>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(PERFORMANCE_SELECT);
    if let Some(category) = category {
        qb.push(" WHERE category = ").push_bind(category);
    }
    qb.push(" ORDER BY recorded_at DESC, id DESC");
    let rows = qb.build_query_as::<PerformanceRecord>().fetch_all(pool).await?;
    Ok(rows)
}

/// A member's records, newest first, optionally capped
pub async fn find_by_member(
    pool: &SqlitePool,
    member_id: i64,
    limit: Option<i64>,
) -> RepoResult<Vec<PerformanceRecord>> {
    let sql = format!(
        "{} WHERE member_id = ? ORDER BY recorded_at DESC, id DESC LIMIT ?",
        PERFORMANCE_SELECT
    );
    let rows = sqlx::query_as::<_, PerformanceRecord>(&sql)
        .bind(member_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Records with `recorded_at >= since` (Unix millis)
pub async fn find_since(pool: &SqlitePool, since: i64) -> RepoResult<Vec<PerformanceRecord>> {
    let sql = format!("{} WHERE recorded_at >= ? ORDER BY recorded_at ASC, id ASC", PERFORMANCE_SELECT);
    let rows = sqlx::query_as::<_, PerformanceRecord>(&sql)
        .bind(since)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// `(member_id, score)` of every record of the given members
pub async fn scores_for_members(pool: &SqlitePool, member_ids: &[i64]) -> RepoResult<Vec<(i64, i64)>> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT member_id, score FROM performance_record WHERE member_id IN (");
    let mut separated = qb.separated(", ");
    for id in member_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: &NewPerformance) -> RepoResult<PerformanceRecord> {
    let now = shared::util::now_millis();
    let record = sqlx::query_as::<_, PerformanceRecord>(
        "INSERT INTO performance_record (member_id, category, score, rating, notes, recorded_at, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         RETURNING id, member_id, category, score, rating, notes, recorded_at, created_at",
    )
    .bind(data.member_id)
    .bind(data.category)
    .bind(data.score)
    .bind(data.rating)
    .bind(&data.notes)
    .bind(data.recorded_at)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::ForeignKey(_) => RepoError::NotFound(format!("Member {} not found", data.member_id)),
        other => other,
    })?;
    Ok(record)
}
