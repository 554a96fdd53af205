//! Member operations
//!
//! Every function takes the caller's identity and checks the access policy
//! before touching storage.

use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Member, MemberCreate, MemberDetail, MemberQuery, MemberUpdate, MemberWithSummary,
};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, Operation, authorize};
use crate::db::repository::member::{MemberFilter, MemberPatch, NewMember};
use crate::db::repository::{RepoError, attendance, member, performance};
use crate::stats;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};

/// Records of each kind embedded in a member detail
pub const DETAIL_RECENT_RECORDS: i64 = 20;

/// Minimum phone length
const MIN_PHONE_LEN: usize = 7;

pub async fn list(
    pool: &SqlitePool,
    user: &CurrentUser,
    query: MemberQuery,
) -> AppResult<Vec<MemberWithSummary>> {
    let scope = authorize(user, Operation::ListMembers, None)?;

    let filter = MemberFilter {
        search: query.search,
        department: query.department,
        status: query.status,
        member_id: scope,
    };
    let members = member::find_all(pool, &filter).await?;

    let ids: Vec<i64> = members.iter().map(|m| m.id).collect();
    let statuses = attendance::statuses_for_members(pool, &ids).await?;
    let scores = performance::scores_for_members(pool, &ids).await?;
    let mut summaries = stats::member_summaries(&statuses, &scores);

    Ok(members
        .into_iter()
        .map(|m| {
            let summary = summaries.remove(&m.id).unwrap_or_default();
            MemberWithSummary { member: m, summary }
        })
        .collect())
}

pub async fn get(pool: &SqlitePool, user: &CurrentUser, id: i64) -> AppResult<MemberDetail> {
    authorize(user, Operation::ReadMember, Some(id))?;

    let member = member::find_by_id(pool, id)
        .await?
        .ok_or_else(|| member_not_found(id))?;

    let all_statuses = attendance::statuses_for_members(pool, &[id]).await?;
    let all_scores = performance::scores_for_members(pool, &[id]).await?;
    let summary = stats::member_summary(
        all_statuses.into_iter().map(|(_, s)| s),
        all_scores.into_iter().map(|(_, s)| s),
    );

    let attendance_records =
        attendance::find_by_member(pool, id, Some(DETAIL_RECENT_RECORDS)).await?;
    let performance_records =
        performance::find_by_member(pool, id, Some(DETAIL_RECENT_RECORDS)).await?;

    Ok(MemberDetail {
        member,
        summary,
        attendance_records,
        performance_records,
    })
}

pub async fn create(
    pool: &SqlitePool,
    user: &CurrentUser,
    tz: Tz,
    payload: MemberCreate,
) -> AppResult<Member> {
    authorize(user, Operation::WriteMember, None)?;
    let data = validate_create(payload, tz)?;

    let created = member::create(pool, &data).await.map_err(map_member_write_error)?;
    tracing::info!(member_id = created.id, vin = %created.vin, operator = user.id, "Member created");
    Ok(created)
}

pub async fn update(
    pool: &SqlitePool,
    user: &CurrentUser,
    tz: Tz,
    id: i64,
    payload: MemberUpdate,
) -> AppResult<Member> {
    authorize(user, Operation::WriteMember, Some(id))?;
    let patch = validate_update(payload, tz)?;

    let updated = member::update(pool, id, &patch).await.map_err(|e| match e {
        RepoError::NotFound(_) => member_not_found(id),
        other => map_member_write_error(other),
    })?;
    tracing::info!(member_id = id, operator = user.id, "Member updated");
    Ok(updated)
}

/// Delete a member and, by cascade, its attendance and performance records
pub async fn delete(pool: &SqlitePool, user: &CurrentUser, id: i64) -> AppResult<()> {
    // Policy first: non-admins learn nothing about existence
    authorize(user, Operation::DeleteMember, Some(id))?;

    if !member::delete(pool, id).await? {
        return Err(member_not_found(id));
    }
    tracing::info!(member_id = id, operator = user.id, "Member deleted");
    Ok(())
}

pub(crate) fn member_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MemberNotFound, format!("Member {id} not found"))
        .with_detail("id", id)
}

fn map_member_write_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) if msg.contains("member.email") => AppError::with_code_for_field(
            ErrorCode::MemberEmailExists,
            "email",
            "a member with this email already exists",
        ),
        RepoError::Duplicate(msg) if msg.contains("member.vin") => {
            AppError::with_message(ErrorCode::VinAllocationFailed, "Could not allocate a member VIN")
        }
        other => other.into(),
    }
}

fn validate_phone(phone: &str) -> AppResult<()> {
    validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if phone.trim().chars().count() < MIN_PHONE_LEN {
        return Err(AppError::invalid_field(
            "phone",
            format!("must be at least {MIN_PHONE_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_create(p: MemberCreate, tz: Tz) -> AppResult<NewMember> {
    validate_required_text(&p.first_name, "firstName", MAX_NAME_LEN)?;
    validate_required_text(&p.last_name, "lastName", MAX_NAME_LEN)?;
    validate_email(&p.email, "email")?;
    validate_phone(&p.phone)?;
    validate_required_text(&p.department, "department", MAX_NAME_LEN)?;
    validate_required_text(&p.batch, "batch", MAX_NAME_LEN)?;
    let join_date = parse_date("joinDate", &p.join_date, tz)?;
    validate_required_text(&p.status, "status", MAX_NAME_LEN)?;
    validate_required_text(&p.position, "position", MAX_NAME_LEN)?;
    validate_required_text(&p.skills, "skills", MAX_NOTE_LEN)?;
    validate_optional_text(&p.notes, "notes", MAX_NOTE_LEN)?;

    Ok(NewMember {
        first_name: p.first_name.trim().to_string(),
        last_name: p.last_name.trim().to_string(),
        email: p.email.trim().to_string(),
        phone: p.phone.trim().to_string(),
        department: p.department.trim().to_string(),
        batch: p.batch.trim().to_string(),
        join_date,
        status: p.status.trim().to_string(),
        position: p.position.trim().to_string(),
        skills: p.skills,
        notes: p.notes,
    })
}

fn validate_update(p: MemberUpdate, tz: Tz) -> AppResult<MemberPatch> {
    fn required(value: Option<String>, field: &str, max_len: usize) -> AppResult<Option<String>> {
        value
            .map(|v| validate_required_text(&v, field, max_len).map(|_| v.trim().to_string()))
            .transpose()
    }

    if let Some(email) = &p.email {
        validate_email(email, "email")?;
    }
    if let Some(phone) = &p.phone {
        validate_phone(phone)?;
    }
    validate_optional_text(&p.notes, "notes", MAX_NOTE_LEN)?;

    Ok(MemberPatch {
        first_name: required(p.first_name, "firstName", MAX_NAME_LEN)?,
        last_name: required(p.last_name, "lastName", MAX_NAME_LEN)?,
        email: p.email.map(|e| e.trim().to_string()),
        phone: p.phone.map(|e| e.trim().to_string()),
        department: required(p.department, "department", MAX_NAME_LEN)?,
        batch: required(p.batch, "batch", MAX_NAME_LEN)?,
        join_date: p
            .join_date
            .as_deref()
            .map(|d| parse_date("joinDate", d, tz))
            .transpose()?,
        status: required(p.status, "status", MAX_NAME_LEN)?,
        position: required(p.position, "position", MAX_NAME_LEN)?,
        skills: required(p.skills, "skills", MAX_NOTE_LEN)?,
        notes: p.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::services::tests::{admin, instructor, member_user};
    use shared::models::AttendanceStatus;

    fn payload(first_name: &str, email: &str) -> MemberCreate {
        MemberCreate {
            first_name: first_name.into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: "555-0100".into(),
            department: "Programming".into(),
            batch: "2024".into(),
            join_date: "2024-09-01".into(),
            status: "Active".into(),
            position: "Member".into(),
            skills: "Rust, CAD".into(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_before_storage() {
        let pool = test_pool().await;
        let mut bad = payload("Ada", "not-an-email");
        let err = create(&pool, &admin(), chrono_tz::UTC, bad.clone()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        bad.email = "ada@club.org".into();
        bad.phone = "123".into();
        let err = create(&pool, &admin(), chrono_tz::UTC, bad).await.unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "phone");

        assert_eq!(member::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_member_role_cannot_create() {
        let pool = test_pool().await;
        let err = create(&pool, &member_user(Some(1)), chrono_tz::UTC, payload("A", "a@club.org"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_member_email_exists() {
        let pool = test_pool().await;
        create(&pool, &instructor(), chrono_tz::UTC, payload("A", "a@club.org"))
            .await
            .unwrap();
        let err = create(&pool, &instructor(), chrono_tz::UTC, payload("B", "a@club.org"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberEmailExists);
    }

    #[tokio::test]
    async fn test_linked_member_lists_only_self_regardless_of_filters() {
        let pool = test_pool().await;
        for (name, email) in [("Ada", "ada@club.org"), ("Bob", "bob@club.org"), ("Cy", "cy@club.org")] {
            create(&pool, &admin(), chrono_tz::UTC, payload(name, email)).await.unwrap();
        }

        let me = member_user(Some(3));
        let all = list(&pool, &me, MemberQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].member.id, 3);

        let query = MemberQuery {
            search: Some("Ada".into()),
            ..Default::default()
        };
        assert!(list(&pool, &me, query).await.unwrap().is_empty());

        let err = list(&pool, &member_user(None), MemberQuery::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotLinked);
    }

    #[tokio::test]
    async fn test_list_embeds_summaries() {
        let pool = test_pool().await;
        let m = create(&pool, &admin(), chrono_tz::UTC, payload("Ada", "ada@club.org"))
            .await
            .unwrap();
        attendance::upsert_batch(
            &pool,
            &[crate::db::repository::attendance::AttendanceUpsert {
                member_id: m.id,
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                status: AttendanceStatus::Late,
                notes: None,
            }],
        )
        .await
        .unwrap();

        let listed = list(&pool, &admin(), MemberQuery::default()).await.unwrap();
        assert_eq!(listed[0].summary.total_attendance, 1);
        assert_eq!(listed[0].summary.attendance_summary[&AttendanceStatus::Late], 1);
        assert_eq!(listed[0].summary.performance_summary.average_score, None);
    }

    #[tokio::test]
    async fn test_get_enforces_own_record_for_members() {
        let pool = test_pool().await;
        let m = create(&pool, &admin(), chrono_tz::UTC, payload("Ada", "ada@club.org"))
            .await
            .unwrap();

        assert!(get(&pool, &member_user(Some(m.id)), m.id).await.is_ok());
        let err = get(&pool, &member_user(Some(m.id + 1)), m.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err = get(&pool, &admin(), 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
    }

    #[tokio::test]
    async fn test_update_patch() {
        let pool = test_pool().await;
        let m = create(&pool, &admin(), chrono_tz::UTC, payload("Ada", "ada@club.org"))
            .await
            .unwrap();
        let patch = MemberUpdate {
            position: Some("Captain".into()),
            join_date: Some("2023-01-10T12:00:00Z".into()),
            ..Default::default()
        };
        let updated = update(&pool, &instructor(), chrono_tz::UTC, m.id, patch).await.unwrap();
        assert_eq!(updated.position, "Captain");
        assert_eq!(updated.join_date.to_string(), "2023-01-10");
        assert_eq!(updated.email, "ada@club.org");

        let err = update(&pool, &admin(), chrono_tz::UTC, 999, MemberUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);

        let blank = MemberUpdate {
            first_name: Some("  ".into()),
            ..Default::default()
        };
        let err = update(&pool, &admin(), chrono_tz::UTC, m.id, blank).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn test_delete_checks_role_before_existence() {
        let pool = test_pool().await;
        // Missing member, non-admin: forbidden, not 404
        let err = delete(&pool, &instructor(), 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);

        let err = delete(&pool, &admin(), 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);

        let m = create(&pool, &admin(), chrono_tz::UTC, payload("Ada", "ada@club.org"))
            .await
            .unwrap();
        delete(&pool, &admin(), m.id).await.unwrap();
        assert!(member::find_by_id(&pool, m.id).await.unwrap().is_none());
    }
}
