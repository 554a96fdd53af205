//! Attendance operations

use std::collections::HashMap;

use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AttendanceQuery, AttendanceRecord, AttendanceWithMember, BulkAttendanceRequest, MemberBrief,
};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, Operation, authorize};
use crate::db::repository::attendance::AttendanceUpsert;
use crate::db::repository::{RepoError, attendance, member};
use crate::services::members::member_not_found;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_BULK_ENTRIES, MAX_NOTE_LEN, parse_enum, validate_optional_text};

/// Records for a calendar day (all days when no date is given), newest first
pub async fn list(
    pool: &SqlitePool,
    user: &CurrentUser,
    tz: Tz,
    query: AttendanceQuery,
) -> AppResult<Vec<AttendanceWithMember>> {
    authorize(user, Operation::ReadAttendance, None)?;
    let date = query
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_date("date", d, tz))
        .transpose()?;

    let records = attendance::find_by_date(pool, date).await?;
    attach_members(pool, records).await
}

/// All records of one member, newest first
pub async fn list_for_member(
    pool: &SqlitePool,
    user: &CurrentUser,
    member_id: i64,
) -> AppResult<Vec<AttendanceRecord>> {
    authorize(user, Operation::ReadMemberAttendance, Some(member_id))?;
    if !member::exists(pool, member_id).await? {
        return Err(member_not_found(member_id));
    }
    Ok(attendance::find_by_member(pool, member_id, None).await?)
}

/// Upsert a batch keyed by (member, club-local date), all or nothing
pub async fn bulk_upsert(
    pool: &SqlitePool,
    user: &CurrentUser,
    tz: Tz,
    request: BulkAttendanceRequest,
) -> AppResult<Vec<AttendanceRecord>> {
    authorize(user, Operation::WriteAttendance, None)?;
    let entries = validate_batch(request, tz)?;

    let records = attendance::upsert_batch(pool, &entries).await.map_err(|e| match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::MemberNotFound, msg),
        RepoError::Busy(msg) => {
            AppError::transaction_failed(format!("Attendance batch rolled back: {msg}"))
        }
        other => other.into(),
    })?;

    tracing::info!(
        entries = entries.len(),
        rows = records.len(),
        operator = user.id,
        "Attendance batch applied"
    );
    Ok(records)
}

/// Validate every entry before any write
fn validate_batch(request: BulkAttendanceRequest, tz: Tz) -> AppResult<Vec<AttendanceUpsert>> {
    if request.records.is_empty() {
        return Err(AppError::with_code_for_field(
            ErrorCode::AttendanceBatchEmpty,
            "records",
            "must contain at least one entry",
        ));
    }
    if request.records.len() > MAX_BULK_ENTRIES {
        return Err(AppError::invalid_field(
            "records",
            format!("must contain at most {MAX_BULK_ENTRIES} entries"),
        ));
    }

    request
        .records
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.member_id <= 0 {
                return Err(AppError::invalid_field(
                    format!("records[{i}].memberId"),
                    "must be a positive id",
                ));
            }
            let date = parse_date(&format!("records[{i}].date"), &entry.date, tz)?;
            let status = parse_enum(
                &entry.status,
                &format!("records[{i}].status"),
                ErrorCode::InvalidAttendanceStatus,
            )?;
            validate_optional_text(&entry.notes, &format!("records[{i}].notes"), MAX_NOTE_LEN)?;
            Ok(AttendanceUpsert {
                member_id: entry.member_id,
                date,
                status,
                notes: entry.notes,
            })
        })
        .collect()
}

async fn attach_members(
    pool: &SqlitePool,
    records: Vec<AttendanceRecord>,
) -> AppResult<Vec<AttendanceWithMember>> {
    let mut ids: Vec<i64> = records.iter().map(|r| r.member_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let briefs: HashMap<i64, MemberBrief> = member::find_briefs(pool, &ids)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    // Members cascade their records, so every record has a member
    Ok(records
        .into_iter()
        .filter_map(|record| {
            let member = briefs.get(&record.member_id)?.clone();
            Some(AttendanceWithMember { record, member })
        })
        .collect())
}
