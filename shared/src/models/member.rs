//! Member Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AttendanceRecord, MemberSummary, PerformanceRecord};

/// Member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    /// Sequential club identifier, `VIN-001`, `VIN-002`, ...
    pub vin: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub join_date: NaiveDate,
    /// Free-text status label (`Active`, `Core`, `Alumni`, ...)
    pub status: String,
    pub position: String,
    pub skills: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Member reference embedded in attendance/performance listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBrief {
    pub id: i64,
    pub vin: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
}

/// Create member payload
///
/// Strings are validated server-side; `join_date` accepts `YYYY-MM-DD` or an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub join_date: String,
    pub status: String,
    pub position: String,
    pub skills: String,
    pub notes: Option<String>,
}

/// Update member payload (partial patch)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub batch: Option<String>,
    pub join_date: Option<String>,
    pub status: Option<String>,
    pub position: Option<String>,
    pub skills: Option<String>,
    pub notes: Option<String>,
}

/// Member list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberQuery {
    /// Case-insensitive substring of first name, last name, email or VIN
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
}

/// Member with attendance/performance rollups, for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithSummary {
    #[serde(flatten)]
    pub member: Member,
    #[serde(flatten)]
    pub summary: MemberSummary,
}

/// Member detail: rollups plus the most recent records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(flatten)]
    pub member: Member,
    #[serde(flatten)]
    pub summary: MemberSummary,
    pub attendance_records: Vec<AttendanceRecord>,
    pub performance_records: Vec<PerformanceRecord>,
}

impl From<&Member> for MemberBrief {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            vin: member.vin.clone(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            department: member.department.clone(),
        }
    }
}
