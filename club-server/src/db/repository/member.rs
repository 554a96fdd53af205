//! Member Repository

use super::{RepoError, RepoResult, is_busy};
use chrono::NaiveDate;
use shared::models::{Member, MemberBrief};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const MEMBER_SELECT: &str = "SELECT id, vin, first_name, last_name, email, phone, department, batch, join_date, status, position, skills, notes, created_at, updated_at FROM member";

/// Attempts for a member insert that loses a VIN race or hits lock contention
const MAX_CREATE_ATTEMPTS: u32 = 5;

/// Validated member fields ready for insertion
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub join_date: NaiveDate,
    pub status: String,
    pub position: String,
    pub skills: String,
    pub notes: Option<String>,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub batch: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub position: Option<String>,
    pub skills: Option<String>,
    pub notes: Option<String>,
}

/// List filters; `member_id` is the policy scope and is ANDed with the rest
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub member_id: Option<i64>,
}

pub async fn find_all(pool: &SqlitePool, filter: &MemberFilter) -> RepoResult<Vec<Member>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(MEMBER_SELECT);
    qb.push(" WHERE 1 = 1");

    if let Some(member_id) = filter.member_id {
        qb.push(" AND id = ").push_bind(member_id);
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (first_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR last_name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR email LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR vin LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(department) = filter.department.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND department = ").push_bind(department.to_string());
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND status = ").push_bind(status.to_string());
    }
    qb.push(" ORDER BY first_name ASC, id ASC");

    let rows = qb.build_query_as::<Member>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Member>> {
    let sql = format!("{} WHERE id = ?", MEMBER_SELECT);
    let row = sqlx::query_as::<_, Member>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM member WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Members referenced by a set of ids, for embedding briefs in listings
pub async fn find_briefs(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MemberBrief>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, vin, first_name, last_name, department FROM member WHERE id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let rows: Vec<(i64, String, String, String, String)> =
        qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(id, vin, first_name, last_name, department)| MemberBrief {
            id,
            vin,
            first_name,
            last_name,
            department,
        })
        .collect())
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM member")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Members whose status label is one of `statuses`
pub async fn count_with_status(pool: &SqlitePool, statuses: &[String]) -> RepoResult<i64> {
    if statuses.is_empty() {
        return Ok(0);
    }
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM member WHERE status IN (");
    let mut separated = qb.separated(", ");
    for status in statuses {
        separated.push_bind(status.clone());
    }
    separated.push_unseparated(")");
    let (n,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(n)
}

/// Insert a member under a freshly allocated VIN
///
/// Allocation and insertion share one transaction whose first statement
/// writes the VIN high-water mark, so concurrent creators serialize on the
/// SQLite write lock. A lost race on the VIN unique index or lock contention
/// is retried a bounded number of times.
pub async fn create(pool: &SqlitePool, data: &NewMember) -> RepoResult<Member> {
    let mut attempt = 1;
    loop {
        match try_create(pool, data).await {
            Ok(member) => return Ok(member),
            Err(e) if attempt < MAX_CREATE_ATTEMPTS && is_retryable(&e) => {
                tracing::warn!(attempt, error = %e, "Member insert contended, retrying");
                attempt += 1;
                tokio::time::sleep(std::time::Duration::from_millis(10 * u64::from(attempt))).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_retryable(err: &sqlx::Error) -> bool {
    if is_busy(err) {
        return true;
    }
    matches!(err, sqlx::Error::Database(db)
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation && db.message().contains("member.vin"))
}

async fn try_create(pool: &SqlitePool, data: &NewMember) -> Result<Member, sqlx::Error> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let number = allocate_vin_number(&mut tx).await?;
    let vin = format_vin(number);

    let result = sqlx::query(
        "INSERT INTO member (vin, first_name, last_name, email, phone, department, batch, join_date, status, position, skills, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
    )
    .bind(&vin)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.department)
    .bind(&data.batch)
    .bind(data.join_date)
    .bind(&data.status)
    .bind(&data.position)
    .bind(&data.skills)
    .bind(&data.notes)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let sql = format!("{} WHERE id = ?", MEMBER_SELECT);
    let member = sqlx::query_as::<_, Member>(&sql)
        .bind(result.last_insert_rowid())
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(member)
}

/// Reserve the next VIN number inside the caller's transaction
///
/// next = max(high-water mark, highest parsable suffix, or highest id when
/// no suffix parses) + 1
async fn allocate_vin_number(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    // Write first: takes the database write lock for the rest of the transaction
    sqlx::query(
        "INSERT INTO vin_sequence (id, last_issued) VALUES (1, 0) \
         ON CONFLICT(id) DO UPDATE SET last_issued = last_issued",
    )
    .execute(&mut *conn)
    .await?;

    let (last_issued,): (i64,) = sqlx::query_as("SELECT last_issued FROM vin_sequence WHERE id = 1")
        .fetch_one(&mut *conn)
        .await?;

    let vins: Vec<(String,)> = sqlx::query_as("SELECT vin FROM member")
        .fetch_all(&mut *conn)
        .await?;
    let (max_id,): (Option<i64>,) = sqlx::query_as("SELECT MAX(id) FROM member")
        .fetch_one(&mut *conn)
        .await?;

    let next = next_vin_number(
        last_issued,
        vins.iter().filter_map(|(vin,)| parse_vin_suffix(vin)),
        max_id.unwrap_or(0),
    );

    sqlx::query("UPDATE vin_sequence SET last_issued = ? WHERE id = 1")
        .bind(next)
        .execute(&mut *conn)
        .await?;

    Ok(next)
}

/// Numeric part of `VIN-<digits>`
pub fn parse_vin_suffix(vin: &str) -> Option<i64> {
    let digits = vin.strip_prefix("VIN-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next VIN number from the high-water mark and the existing suffixes
pub fn next_vin_number(last_issued: i64, suffixes: impl Iterator<Item = i64>, max_id: i64) -> i64 {
    let existing = suffixes.max().unwrap_or(max_id);
    last_issued.max(existing) + 1
}

/// `VIN-` followed by at least three digits
pub fn format_vin(number: i64) -> String {
    format!("VIN-{:03}", number)
}

pub async fn update(pool: &SqlitePool, id: i64, data: &MemberPatch) -> RepoResult<Member> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE member SET first_name = COALESCE(?1, first_name), last_name = COALESCE(?2, last_name), email = COALESCE(?3, email), phone = COALESCE(?4, phone), department = COALESCE(?5, department), batch = COALESCE(?6, batch), join_date = COALESCE(?7, join_date), status = COALESCE(?8, status), position = COALESCE(?9, position), skills = COALESCE(?10, skills), notes = COALESCE(?11, notes), updated_at = ?12 WHERE id = ?13",
    )
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.department)
    .bind(&data.batch)
    .bind(data.join_date)
    .bind(&data.status)
    .bind(&data.position)
    .bind(&data.skills)
    .bind(&data.notes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id} not found")))
}

/// Hard delete; attendance and performance rows cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM member WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{insert_member, test_pool};

    fn new_member(first_name: &str, email: &str) -> NewMember {
        NewMember {
            first_name: first_name.into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: "555-0100".into(),
            department: "Programming".into(),
            batch: "2024".into(),
            join_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            status: "Active".into(),
            position: "Member".into(),
            skills: "Rust".into(),
            notes: None,
        }
    }

    #[test]
    fn test_parse_vin_suffix() {
        assert_eq!(parse_vin_suffix("VIN-007"), Some(7));
        assert_eq!(parse_vin_suffix("VIN-1234"), Some(1234));
        assert_eq!(parse_vin_suffix("VIN-"), None);
        assert_eq!(parse_vin_suffix("VIN-12a"), None);
        assert_eq!(parse_vin_suffix("ABC-001"), None);
    }

    #[test]
    fn test_next_vin_number() {
        assert_eq!(next_vin_number(0, std::iter::empty(), 0), 1);
        assert_eq!(next_vin_number(0, [3, 9, 4].into_iter(), 12), 10);
        // No parsable suffix: fall back to highest id
        assert_eq!(next_vin_number(0, std::iter::empty(), 12), 13);
        // High-water mark wins over deleted members
        assert_eq!(next_vin_number(20, [3].into_iter(), 3), 21);
    }

    #[test]
    fn test_format_vin_pads_to_three_digits() {
        assert_eq!(format_vin(1), "VIN-001");
        assert_eq!(format_vin(42), "VIN-042");
        assert_eq!(format_vin(1234), "VIN-1234");
    }

    #[tokio::test]
    async fn test_sequential_creates_yield_consecutive_vins() {
        let pool = test_pool().await;
        for i in 1..=5 {
            let m = create(&pool, &new_member("Ada", &format!("ada{i}@club.org")))
                .await
                .unwrap();
            assert_eq!(m.vin, format_vin(i));
        }
    }

    #[tokio::test]
    async fn test_vin_not_reused_after_delete() {
        let pool = test_pool().await;
        create(&pool, &new_member("A", "a@club.org")).await.unwrap();
        let b = create(&pool, &new_member("B", "b@club.org")).await.unwrap();
        assert_eq!(b.vin, "VIN-002");
        assert!(delete(&pool, b.id).await.unwrap());
        let c = create(&pool, &new_member("C", "c@club.org")).await.unwrap();
        assert_eq!(c.vin, "VIN-003");
    }

    #[tokio::test]
    async fn test_vin_continues_from_highest_existing_suffix() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-041", "Old").await;
        let m = create(&pool, &new_member("New", "new@club.org")).await.unwrap();
        assert_eq!(m.vin, "VIN-042");
    }

    #[tokio::test]
    async fn test_concurrent_creates_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vin.db");
        let db = crate::db::DbService::new(path.to_str().unwrap()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let pool = db.pool.clone();
            handles.push(tokio::spawn(async move {
                create(&pool, &new_member("Par", &format!("par{i}@club.org")))
                    .await
                    .unwrap()
                    .vin
            }));
        }
        let mut vins = Vec::new();
        for h in handles {
            vins.push(h.await.unwrap());
        }
        vins.sort();
        let expected: Vec<String> = (1..=8).map(format_vin).collect();
        assert_eq!(vins, expected);
        db.pool.close().await;
    }

    #[tokio::test]
    async fn test_duplicate_email_is_duplicate() {
        let pool = test_pool().await;
        create(&pool, &new_member("A", "same@club.org")).await.unwrap();
        let err = create(&pool, &new_member("B", "same@club.org")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("member.email")));
    }

    #[tokio::test]
    async fn test_find_all_filters_and_order() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Zoe").await;
        insert_member(&pool, 2, "VIN-002", "Ada").await;
        insert_member(&pool, 3, "VIN-003", "Max").await;

        let all = find_all(&pool, &MemberFilter::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|m| m.first_name.as_str()).collect();
        assert_eq!(names, ["Ada", "Max", "Zoe"]);

        let filter = MemberFilter {
            search: Some("vin-003".into()),
            ..Default::default()
        };
        let found = find_all(&pool, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);

        // Scope narrows; a conflicting filter yields an empty list
        let filter = MemberFilter {
            search: Some("zoe".into()),
            member_id: Some(3),
            ..Default::default()
        };
        assert!(find_all(&pool, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Ada").await;
        let filter = MemberFilter {
            search: Some("%".into()),
            ..Default::default()
        };
        assert!(find_all(&pool, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_patch_keeps_unspecified_fields() {
        let pool = test_pool().await;
        let m = create(&pool, &new_member("Ada", "ada@club.org")).await.unwrap();
        let patch = MemberPatch {
            status: Some("Alumni".into()),
            ..Default::default()
        };
        let updated = update(&pool, m.id, &patch).await.unwrap();
        assert_eq!(updated.status, "Alumni");
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.vin, m.vin);

        let err = update(&pool, 999, &patch).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_counts() {
        let pool = test_pool().await;
        insert_member(&pool, 1, "VIN-001", "Ada").await;
        insert_member(&pool, 2, "VIN-002", "Bob").await;
        sqlx::query("UPDATE member SET status = 'Alumni' WHERE id = 2")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(count(&pool).await.unwrap(), 2);
        let active = vec!["Active".to_string(), "Core".to_string()];
        assert_eq!(count_with_status(&pool, &active).await.unwrap(), 1);
        assert_eq!(count_with_status(&pool, &[]).await.unwrap(), 0);
    }
}
