//! Attendance Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{MemberBrief, UnknownVariant};

/// Attendance status for one member on one calendar day
///
/// Ordering follows declaration order and drives the key order of
/// per-status count maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::Absent,
        AttendanceStatus::Excused,
    ];

    const NAMES: &'static [&'static str] = &["PRESENT", "LATE", "ABSENT", "EXCUSED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Late => "LATE",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::Excused => "EXCUSED",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESENT" => Ok(AttendanceStatus::Present),
            "LATE" => Ok(AttendanceStatus::Late),
            "ABSENT" => Ok(AttendanceStatus::Absent),
            "EXCUSED" => Ok(AttendanceStatus::Excused),
            _ => Err(UnknownVariant {
                kind: "attendance status",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Membership test for raw attendance status strings
pub fn is_attendance_status(value: &str) -> bool {
    value.parse::<AttendanceStatus>().is_ok()
}

/// Attendance record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    pub member_id: i64,
    /// Club-local calendar day
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attendance record with its member, for date listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithMember {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub member: MemberBrief,
}

/// One entry of a bulk upsert
///
/// `status` and `date` stay raw strings until validation so that errors can
/// name the offending entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryInput {
    pub member_id: i64,
    /// `YYYY-MM-DD` or RFC 3339 timestamp
    pub date: String,
    pub status: String,
    /// Omitted notes keep the stored value on overwrite
    pub notes: Option<String>,
}

/// Bulk upsert payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAttendanceRequest {
    pub records: Vec<AttendanceEntryInput>,
}

/// Attendance listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceQuery {
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_membership() {
        for name in ["PRESENT", "LATE", "ABSENT", "EXCUSED"] {
            assert!(is_attendance_status(name));
        }
        assert!(!is_attendance_status("present"));
        assert!(!is_attendance_status("SICK"));
    }

    #[test]
    fn test_unknown_status_error_lists_choices() {
        let err = "HERE".parse::<AttendanceStatus>().unwrap_err();
        assert_eq!(err.value, "HERE");
        assert_eq!(
            err.to_string(),
            "invalid attendance status 'HERE', expected one of PRESENT, LATE, ABSENT, EXCUSED"
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = AttendanceRecord {
            id: 1,
            member_id: 7,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            status: AttendanceStatus::Late,
            notes: None,
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["memberId"], 7);
        assert_eq!(json["date"], "2024-03-09");
        assert_eq!(json["status"], "LATE");
    }
}
