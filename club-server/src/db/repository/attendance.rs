//! Attendance Repository

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{AttendanceRecord, AttendanceStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ATTENDANCE_SELECT: &str =
    "SELECT id, member_id, date, status, notes, created_at, updated_at FROM attendance_record";

/// One validated upsert entry keyed by (member_id, date)
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceUpsert {
    pub member_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// `None` keeps the stored note on overwrite
    pub notes: Option<String>,
}

/// Records for one calendar day, or all records; newest first
pub async fn find_by_date(
    pool: &SqlitePool,
    date: Option<NaiveDate>,
) -> RepoResult<Vec<AttendanceRecord>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ATTENDANCE_SELECT);
    if let Some(date) = date {
        qb.push(" WHERE date = ").push_bind(date);
    }
    qb.push(" ORDER BY date DESC, id DESC");
    let rows = qb.build_query_as::<AttendanceRecord>().fetch_all(pool).await?;
    Ok(rows)
}

/// A member's records, newest first, optionally capped
pub async fn find_by_member(
    pool: &SqlitePool,
    member_id: i64,
    limit: Option<i64>,
) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!(
        "{} WHERE member_id = ? ORDER BY date DESC, id DESC LIMIT ?",
        ATTENDANCE_SELECT
    );
    let rows = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(member_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Records on or after `start`, oldest first
pub async fn find_since(pool: &SqlitePool, start: NaiveDate) -> RepoResult<Vec<AttendanceRecord>> {
    let sql = format!("{} WHERE date >= ? ORDER BY date ASC, id ASC", ATTENDANCE_SELECT);
    let rows = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(start)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// `(member_id, status)` of every record of the given members
pub async fn statuses_for_members(
    pool: &SqlitePool,
    member_ids: &[i64],
) -> RepoResult<Vec<(i64, AttendanceStatus)>> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT member_id, status FROM attendance_record WHERE member_id IN (");
    let mut separated = qb.separated(", ");
    for id in member_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

/// Apply a batch of upserts atomically
///
/// Every referenced member must exist, otherwise nothing is written. Later
/// entries for the same (member, date) overwrite earlier ones; the result
/// holds one row per touched key in first-touch order with its final state.
pub async fn upsert_batch(
    pool: &SqlitePool,
    entries: &[AttendanceUpsert],
) -> RepoResult<Vec<AttendanceRecord>> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let mut checked: Vec<i64> = Vec::new();
    for entry in entries {
        if checked.contains(&entry.member_id) {
            continue;
        }
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM member WHERE id = ?")
            .bind(entry.member_id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            // Dropping the transaction rolls it back
            return Err(RepoError::NotFound(format!("Member {} not found", entry.member_id)));
        }
        checked.push(entry.member_id);
    }

    let mut results: Vec<AttendanceRecord> = Vec::with_capacity(entries.len());
    let mut positions: HashMap<i64, usize> = HashMap::new();
    for entry in entries {
        let record = sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_record (member_id, date, status, notes, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             ON CONFLICT(member_id, date) DO UPDATE SET \
                 status = excluded.status, \
                 notes = COALESCE(excluded.notes, attendance_record.notes), \
                 updated_at = excluded.updated_at \
             RETURNING id, member_id, date, status, notes, created_at, updated_at",
        )
        .bind(entry.member_id)
        .bind(entry.date)
        .bind(entry.status)
        .bind(&entry.notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        match positions.get(&record.id) {
            Some(&i) => results[i] = record,
            None => {
                positions.insert(record.id, results.len());
                results.push(record);
            }
        }
    }

    tx.commit().await?;
    Ok(results)
}
