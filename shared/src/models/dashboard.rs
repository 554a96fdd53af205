//! Aggregated views: per-member summaries and the dashboard

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AttendanceStatus, PerformanceCategory};

/// Per-status attendance counts with every status present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StatusCounts {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub excused: u32,
}

impl StatusCounts {
    pub fn increment(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
    }

    pub fn get(&self, status: AttendanceStatus) -> u32 {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Late => self.late,
            AttendanceStatus::Absent => self.absent,
            AttendanceStatus::Excused => self.excused,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.late + self.absent + self.excused
    }
}

/// One day of the attendance trend, serialized as `{date, PRESENT, LATE, ...}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

impl DailyAttendance {
    /// Zero-filled bucket
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            counts: StatusCounts::default(),
        }
    }
}

/// Score rollup of a member's performance records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub count: u32,
    /// Rounded mean score, `None` without records
    pub average_score: Option<i64>,
}

/// Per-category averages over the performance window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub category: PerformanceCategory,
    pub average_score: i64,
    /// Mean rating rounded to one decimal place
    pub average_rating: f64,
}

/// Attendance and performance rollup attached to member views
///
/// `attendance_summary` only carries statuses that occur.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub attendance_summary: BTreeMap<AttendanceStatus, u32>,
    pub total_attendance: u32,
    pub performance_summary: PerformanceSummary,
}

/// Dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_members: i64,
    pub active_members: i64,
    pub today_attendance: DailyAttendance,
    pub performance_summary: Vec<CategoryPerformance>,
    pub attendance_trend: Vec<DailyAttendance>,
}
