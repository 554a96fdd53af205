//! 社团时区下的时间工具
//!
//! 日历日为社团时区下的 `NaiveDate`，时间点为 Unix 毫秒。
//! 客户端输入的时间转换都在这里完成。

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use shared::error::{AppError, AppResult};

/// 解析日历日: `YYYY-MM-DD`，或 RFC 3339 时间戳换算到
/// 社团本地日期
pub fn parse_date(field: &str, value: &str, tz: Tz) -> AppResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .map_err(|_| {
            AppError::invalid_field(
                field,
                format!("invalid date '{value}', expected YYYY-MM-DD or RFC 3339"),
            )
        })
}

/// 解析时间点: RFC 3339 时间戳，或 `YYYY-MM-DD` 表示
/// 该社团本地日期的开始
pub fn parse_timestamp_millis(field: &str, value: &str, tz: Tz) -> AppResult<i64> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| day_start_millis(date, tz))
        .map_err(|_| {
            AppError::invalid_field(
                field,
                format!("invalid timestamp '{value}', expected RFC 3339 or YYYY-MM-DD"),
            )
        })
}

/// 社团时区的今天
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 日期开始 (00:00:00) → Unix 毫秒 (社团时区)
///
/// DST 间隙回退: 本地午夜不存在时回退到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 截至今天 (含) 的 `days` 天窗口的第一天
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today - Duration::days(i64::from(days.max(1)) - 1)
}

/// `now_millis` 之前 `days` 天的时间点
pub fn millis_days_ago(now_millis: i64, days: u32) -> i64 {
    now_millis - Duration::days(i64::from(days)).num_milliseconds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_date("date", "2024-02-29", chrono_tz::UTC).unwrap(),
            ymd(2024, 2, 29)
        );
    }

    #[test]
    fn test_parse_datetime_normalizes_to_club_day() {
        // UTC 23:30 在东京已是次日
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        assert_eq!(
            parse_date("date", "2024-03-01T23:30:00Z", tz).unwrap(),
            ymd(2024, 3, 2)
        );
        assert_eq!(
            parse_date("date", "2024-03-01T23:30:00Z", chrono_tz::UTC).unwrap(),
            ymd(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("records[0].date", "yesterday", chrono_tz::UTC).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.starts_with("records[0].date:"));
    }

    #[test]
    fn test_parse_timestamp_millis() {
        assert_eq!(
            parse_timestamp_millis("recordedAt", "1970-01-01T00:00:01Z", chrono_tz::UTC).unwrap(),
            1000
        );
        assert_eq!(
            parse_timestamp_millis("recordedAt", "1970-01-02", chrono_tz::UTC).unwrap(),
            86_400_000
        );
        assert!(parse_timestamp_millis("recordedAt", "soon", chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_window_start_is_inclusive() {
        assert_eq!(window_start(ymd(2024, 3, 15), 15), ymd(2024, 3, 1));
        assert_eq!(window_start(ymd(2024, 3, 15), 1), ymd(2024, 3, 15));
    }
}
