//! Performance operations

use std::collections::HashMap;

use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    MemberBrief, PerformanceCategory, PerformanceCreate, PerformanceQuery, PerformanceRecord,
    PerformanceWithMember, RATING_RANGE, SCORE_RANGE,
};
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, Operation, authorize};
use crate::db::repository::performance::NewPerformance;
use crate::db::repository::{RepoError, member, performance};
use crate::services::members::member_not_found;
use crate::utils::time::parse_timestamp_millis;
use crate::utils::validation::{MAX_NOTE_LEN, parse_enum, validate_optional_text, validate_range};

/// Records of a category (all categories when none is given), newest first
pub async fn list(
    pool: &SqlitePool,
    user: &CurrentUser,
    query: PerformanceQuery,
) -> AppResult<Vec<PerformanceWithMember>> {
    authorize(user, Operation::ReadPerformance, None)?;
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| {
            parse_enum::<PerformanceCategory>(c, "category", ErrorCode::InvalidPerformanceCategory)
        })
        .transpose()?;

    let records = performance::find_by_category(pool, category).await?;

    let mut ids: Vec<i64> = records.iter().map(|r| r.member_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let briefs: HashMap<i64, MemberBrief> = member::find_briefs(pool, &ids)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    Ok(records
        .into_iter()
        .filter_map(|record| {
            let member = briefs.get(&record.member_id)?.clone();
            Some(PerformanceWithMember { record, member })
        })
        .collect())
}

/// All records of one member, newest first
pub async fn list_for_member(
    pool: &SqlitePool,
    user: &CurrentUser,
    member_id: i64,
) -> AppResult<Vec<PerformanceRecord>> {
    authorize(user, Operation::ReadMemberPerformance, Some(member_id))?;
    if !member::exists(pool, member_id).await? {
        return Err(member_not_found(member_id));
    }
    Ok(performance::find_by_member(pool, member_id, None).await?)
}

pub async fn create(
    pool: &SqlitePool,
    user: &CurrentUser,
    tz: Tz,
    payload: PerformanceCreate,
) -> AppResult<PerformanceRecord> {
    authorize(user, Operation::WritePerformance, None)?;
    let data = validate_create(payload, tz)?;

    let record = performance::create(pool, &data).await.map_err(|e| match e {
        RepoError::NotFound(_) => member_not_found(data.member_id),
        other => other.into(),
    })?;
    tracing::info!(
        record_id = record.id,
        member_id = record.member_id,
        category = %record.category,
        operator = user.id,
        "Performance recorded"
    );
    Ok(record)
}

fn validate_create(p: PerformanceCreate, tz: Tz) -> AppResult<NewPerformance> {
    if p.member_id <= 0 {
        return Err(AppError::invalid_field("memberId", "must be a positive id"));
    }
    let category = parse_enum::<PerformanceCategory>(
        &p.category,
        "category",
        ErrorCode::InvalidPerformanceCategory,
    )?;
    validate_range(p.score, SCORE_RANGE, "score", ErrorCode::ScoreOutOfRange)?;
    validate_range(p.rating, RATING_RANGE, "rating", ErrorCode::RatingOutOfRange)?;
    validate_optional_text(&p.notes, "notes", MAX_NOTE_LEN)?;
    let recorded_at = match p.recorded_at.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_timestamp_millis("recordedAt", raw, tz)?,
        None => shared::util::now_millis(),
    };

    Ok(NewPerformance {
        member_id: p.member_id,
        category,
        score: p.score,
        rating: p.rating,
        notes: p.notes,
        recorded_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{insert_member, test_pool};
    use crate::services::tests::{admin, instructor, member_user};

    fn payload(member_id: i64, category: &str, score: i64, rating: i64) -> PerformanceCreate {
        PerformanceCreate {
            member_id,
            category: category.into(),
            score,
            rating,
            notes: None,
            recorded_at: None,
        }
    }

    #[tokio::test]
    async fn test_range_validation() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Ada").await;

        let err = create(&pool, &admin(), chrono_tz::UTC, payload(1, "DESIGN", 101, 5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ScoreOutOfRange);

        let err = create(&pool, &admin(), chrono_tz::UTC, payload(1, "DESIGN", 50, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RatingOutOfRange);

        let err = create(&pool, &admin(), chrono_tz::UTC, payload(1, "COOKING", 50, 5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPerformanceCategory);

        for (score, rating) in [(0, 1), (100, 10)] {
            create(&pool, &admin(), chrono_tz::UTC, payload(1, "DESIGN", score, rating))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_recorded_at_defaults_to_now() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Ada").await;
        let before = shared::util::now_millis();
        let record = create(&pool, &instructor(), chrono_tz::UTC, payload(1, "OUTREACH", 70, 7))
            .await
            .unwrap();
        assert!(record.recorded_at >= before);

        let mut explicit = payload(1, "OUTREACH", 70, 7);
        explicit.recorded_at = Some("2024-01-01T00:00:00Z".into());
        let record = create(&pool, &instructor(), chrono_tz::UTC, explicit).await.unwrap();
        assert_eq!(record.recorded_at, 1_704_067_200_000);
    }

    #[tokio::test]
    async fn test_unknown_member_not_found() {
        let pool = test_pool().await;
        let err = create(&pool, &admin(), chrono_tz::UTC, payload(9, "STRATEGY", 50, 5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotFound);
    }

    #[tokio::test]
    async fn test_member_role_access() {
        let pool = test_pool().await;
        insert_member(&pool, 3, "VIN-003", "Ada").await;
        create(&pool, &admin(), chrono_tz::UTC, payload(3, "DESIGN", 80, 8))
            .await
            .unwrap();

        let me = member_user(Some(3));
        assert_eq!(list_for_member(&pool, &me, 3).await.unwrap().len(), 1);
        let err = list_for_member(&pool, &me, 2).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        let err = list(&pool, &me, PerformanceQuery::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        let err = create(&pool, &me, chrono_tz::UTC, payload(3, "DESIGN", 80, 8))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_list_by_category() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Ada").await;
        create(&pool, &admin(), chrono_tz::UTC, payload(1, "DESIGN", 80, 8)).await.unwrap();
        create(&pool, &admin(), chrono_tz::UTC, payload(1, "STRATEGY", 60, 6)).await.unwrap();

        let query = PerformanceQuery {
            category: Some("DESIGN".into()),
        };
        let design = list(&pool, &admin(), query).await.unwrap();
        assert_eq!(design.len(), 1);
        assert_eq!(design[0].member.first_name, "Ada");

        let query = PerformanceQuery {
            category: Some("design".into()),
        };
        let err = list(&pool, &admin(), query).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPerformanceCategory);
    }
}
