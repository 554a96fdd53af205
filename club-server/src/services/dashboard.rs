//! Dashboard summary

use chrono::NaiveDate;
use shared::error::AppResult;
use shared::models::DashboardSummary;
use sqlx::SqlitePool;

use crate::auth::{CurrentUser, Operation, authorize};
use crate::core::Config;
use crate::db::repository::{attendance, member, performance};
use crate::stats;
use crate::utils::time;

/// Summary as of now in the club timezone
pub async fn summary(
    pool: &SqlitePool,
    user: &CurrentUser,
    config: &Config,
) -> AppResult<DashboardSummary> {
    let today = time::today(config.timezone);
    summary_at(pool, user, config, today, shared::util::now_millis()).await
}

/// Summary as of a given day and instant
pub async fn summary_at(
    pool: &SqlitePool,
    user: &CurrentUser,
    config: &Config,
    today: NaiveDate,
    now_millis: i64,
) -> AppResult<DashboardSummary> {
    authorize(user, Operation::ReadDashboard, None)?;

    let trend_start = time::window_start(today, config.attendance_trend_days);
    let performance_since = time::millis_days_ago(now_millis, config.performance_window_days);

    let total_members = member::count(pool).await?;
    let active_members = member::count_with_status(pool, &config.active_member_statuses).await?;
    let attendance_records = attendance::find_since(pool, trend_start).await?;
    let performance_records = performance::find_since(pool, performance_since).await?;

    let attendance_trend =
        stats::attendance_trend(&attendance_records, today, config.attendance_trend_days);
    let today_attendance = stats::today_attendance(&attendance_trend, today);
    let performance_summary = stats::category_performance(&performance_records, performance_since);

    Ok(DashboardSummary {
        total_members,
        active_members,
        today_attendance,
        performance_summary,
        attendance_trend,
    })
}
