//! Aggregation over raw attendance and performance records
//!
//! Pure functions: callers load the records, these fold them into the
//! summaries served to clients.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use shared::models::{
    AttendanceRecord, AttendanceStatus, CategoryPerformance, DailyAttendance, MemberSummary,
    PerformanceCategory, PerformanceRecord, PerformanceSummary,
};

/// Mean rounded half away from zero; `None` for an empty input
fn rounded_mean(total: i64, count: u32) -> Option<i64> {
    (count > 0).then(|| (total as f64 / f64::from(count)).round() as i64)
}

/// Status → count, only statuses that occur; plus the total
pub fn attendance_counts(
    statuses: impl IntoIterator<Item = AttendanceStatus>,
) -> (BTreeMap<AttendanceStatus, u32>, u32) {
    let mut counts = BTreeMap::new();
    let mut total = 0;
    for status in statuses {
        *counts.entry(status).or_insert(0) += 1;
        total += 1;
    }
    (counts, total)
}

pub fn performance_summary(scores: impl IntoIterator<Item = i64>) -> PerformanceSummary {
    let (total, count) = scores
        .into_iter()
        .fold((0i64, 0u32), |(total, count), score| (total + score, count + 1));
    PerformanceSummary {
        count,
        average_score: rounded_mean(total, count),
    }
}

pub fn member_summary(
    statuses: impl IntoIterator<Item = AttendanceStatus>,
    scores: impl IntoIterator<Item = i64>,
) -> MemberSummary {
    let (attendance_summary, total_attendance) = attendance_counts(statuses);
    MemberSummary {
        attendance_summary,
        total_attendance,
        performance_summary: performance_summary(scores),
    }
}

/// Summaries for many members from `(member_id, status)` and
/// `(member_id, score)` pairs; members without records are absent
pub fn member_summaries(
    attendance: &[(i64, AttendanceStatus)],
    scores: &[(i64, i64)],
) -> HashMap<i64, MemberSummary> {
    let mut statuses_by_member: HashMap<i64, Vec<AttendanceStatus>> = HashMap::new();
    for (member_id, status) in attendance {
        statuses_by_member.entry(*member_id).or_default().push(*status);
    }
    let mut scores_by_member: HashMap<i64, Vec<i64>> = HashMap::new();
    for (member_id, score) in scores {
        scores_by_member.entry(*member_id).or_default().push(*score);
    }

    let ids: BTreeSet<i64> = statuses_by_member
        .keys()
        .chain(scores_by_member.keys())
        .copied()
        .collect();

    ids.into_iter()
        .map(|id| {
            let statuses = statuses_by_member.remove(&id).unwrap_or_default();
            let scores = scores_by_member.remove(&id).unwrap_or_default();
            (id, member_summary(statuses, scores))
        })
        .collect()
}

/// Daily buckets for the `days` days ending `today`, ascending
///
/// Every bucket starts with all statuses at zero; records outside the
/// window are ignored.
pub fn attendance_trend(
    records: &[AttendanceRecord],
    today: NaiveDate,
    days: u32,
) -> Vec<DailyAttendance> {
    let days = days.max(1);
    let start = today - Duration::days(i64::from(days) - 1);
    let mut trend: Vec<DailyAttendance> = (0..days)
        .map(|offset| DailyAttendance::empty(start + Duration::days(i64::from(offset))))
        .collect();

    for record in records {
        if record.date < start || record.date > today {
            continue;
        }
        let index = (record.date - start).num_days() as usize;
        trend[index].counts.increment(record.status);
    }
    trend
}

/// Bucket for `today` from a trend, zero-filled when absent
pub fn today_attendance(trend: &[DailyAttendance], today: NaiveDate) -> DailyAttendance {
    trend
        .iter()
        .find(|day| day.date == today)
        .copied()
        .unwrap_or_else(|| DailyAttendance::empty(today))
}

/// Per-category averages of records recorded at or after `since_millis`
///
/// Categories come out in declaration order; empty ones are omitted.
pub fn category_performance(
    records: &[PerformanceRecord],
    since_millis: i64,
) -> Vec<CategoryPerformance> {
    #[derive(Default)]
    struct Totals {
        score: i64,
        rating: i64,
        count: u32,
    }

    let mut totals: BTreeMap<PerformanceCategory, Totals> = BTreeMap::new();
    for record in records.iter().filter(|r| r.recorded_at >= since_millis) {
        let t = totals.entry(record.category).or_default();
        t.score += record.score;
        t.rating += record.rating;
        t.count += 1;
    }

    totals
        .into_iter()
        .filter_map(|(category, t)| {
            let average_score = rounded_mean(t.score, t.count)?;
            let mean_rating = t.rating as f64 / f64::from(t.count);
            Some(CategoryPerformance {
                category,
                average_score,
                average_rating: (mean_rating * 10.0).round() / 10.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn att(date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            member_id: 1,
            date,
            status,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn perf(category: PerformanceCategory, score: i64, rating: i64, at: i64) -> PerformanceRecord {
        PerformanceRecord {
            id: 0,
            member_id: 1,
            category,
            score,
            rating,
            notes: None,
            recorded_at: at,
            created_at: at,
        }
    }

    #[test]
    fn test_attendance_counts_omit_zero_statuses() {
        use AttendanceStatus::*;
        let (counts, total) = attendance_counts([Present, Late, Present]);
        assert_eq!(total, 3);
        assert_eq!(counts.get(&Present), Some(&2));
        assert_eq!(counts.get(&Late), Some(&1));
        assert!(!counts.contains_key(&Absent));
    }

    #[test]
    fn test_performance_summary_rounds_half_away_from_zero() {
        let s = performance_summary([70, 71]);
        assert_eq!(s.count, 2);
        assert_eq!(s.average_score, Some(71)); // 70.5
        assert_eq!(performance_summary([1, 2, 2]).average_score, Some(2)); // 1.67
        assert_eq!(performance_summary(std::iter::empty()).average_score, None);
    }

    #[test]
    fn test_member_summaries_group_by_member() {
        use AttendanceStatus::*;
        let summaries = member_summaries(&[(1, Present), (2, Absent), (1, Late)], &[(2, 90)]);
        assert_eq!(summaries[&1].total_attendance, 2);
        assert_eq!(summaries[&1].performance_summary.count, 0);
        assert_eq!(summaries[&2].performance_summary.average_score, Some(90));
        assert!(!summaries.contains_key(&3));
    }

    #[test]
    fn test_member_with_both_record_kinds_summarized_once() {
        use AttendanceStatus::*;
        let summaries = member_summaries(
            &[(1, Present), (1, Absent), (2, Late)],
            &[(1, 80), (1, 91), (3, 70)],
        );
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[&1].total_attendance, 2);
        assert_eq!(summaries[&1].performance_summary.count, 2);
        assert_eq!(summaries[&1].performance_summary.average_score, Some(86));
        assert_eq!(summaries[&3].total_attendance, 0);
    }

    #[test]
    fn test_trend_has_fifteen_ascending_buckets() {
        let today = ymd(3, 15);
        let trend = attendance_trend(&[], today, 15);
        assert_eq!(trend.len(), 15);
        assert_eq!(trend[0].date, ymd(3, 1));
        assert_eq!(trend[14].date, today);
        assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
        assert!(trend.iter().all(|d| d.counts.total() == 0));
    }

    #[test]
    fn test_trend_counts_in_window_and_drops_outside() {
        use AttendanceStatus::*;
        let today = ymd(3, 15);
        let records = [
            att(ymd(3, 15), Present),
            att(ymd(3, 15), Late),
            att(ymd(3, 1), Absent),
            att(ymd(2, 29), Present), // before window
            att(ymd(3, 16), Present), // future
        ];
        let trend = attendance_trend(&records, today, 15);
        let total: u32 = trend.iter().map(|d| d.counts.total()).sum();
        assert_eq!(total, 3);
        assert_eq!(trend[0].counts.absent, 1);
        assert_eq!(trend[14].counts.present, 1);
        assert_eq!(trend[14].counts.late, 1);
    }

    #[test]
    fn test_today_attendance_defaults_to_zero() {
        let today = ymd(3, 15);
        let trend = attendance_trend(&[att(today, AttendanceStatus::Excused)], today, 15);
        assert_eq!(today_attendance(&trend, today).counts.excused, 1);

        let missing = today_attendance(&[], today);
        assert_eq!(missing.date, today);
        assert_eq!(missing.counts.total(), 0);
    }

    #[test]
    fn test_category_performance() {
        use PerformanceCategory::*;
        let records = [
            perf(Programming, 80, 7, 100),
            perf(Programming, 91, 8, 100),
            perf(Mechanical, 50, 3, 100),
            perf(Design, 100, 10, 10), // outside window
        ];
        let summary = category_performance(&records, 50);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].category, Mechanical);
        assert_eq!(summary[0].average_score, 50);
        assert_eq!(summary[1].category, Programming);
        assert_eq!(summary[1].average_score, 86); // 85.5
        assert_eq!(summary[1].average_rating, 7.5);
    }

    #[test]
    fn test_average_rating_one_decimal() {
        let records = [
            perf(PerformanceCategory::Strategy, 10, 7, 0),
            perf(PerformanceCategory::Strategy, 10, 7, 0),
            perf(PerformanceCategory::Strategy, 10, 8, 0),
        ];
        let summary = category_performance(&records, 0);
        assert_eq!(summary[0].average_rating, 7.3);
    }
}
