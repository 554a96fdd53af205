//! Performance Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{MemberBrief, UnknownVariant};

/// Inclusive bounds for a performance score
pub const SCORE_RANGE: std::ops::RangeInclusive<i64> = 0..=100;
/// Inclusive bounds for a performance rating
pub const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

/// Skill area a performance record is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PerformanceCategory {
    Mechanical,
    Electronics,
    Programming,
    Strategy,
    Design,
    Outreach,
}

impl PerformanceCategory {
    pub const ALL: [PerformanceCategory; 6] = [
        PerformanceCategory::Mechanical,
        PerformanceCategory::Electronics,
        PerformanceCategory::Programming,
        PerformanceCategory::Strategy,
        PerformanceCategory::Design,
        PerformanceCategory::Outreach,
    ];

    const NAMES: &'static [&'static str] = &[
        "MECHANICAL",
        "ELECTRONICS",
        "PROGRAMMING",
        "STRATEGY",
        "DESIGN",
        "OUTREACH",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceCategory::Mechanical => "MECHANICAL",
            PerformanceCategory::Electronics => "ELECTRONICS",
            PerformanceCategory::Programming => "PROGRAMMING",
            PerformanceCategory::Strategy => "STRATEGY",
            PerformanceCategory::Design => "DESIGN",
            PerformanceCategory::Outreach => "OUTREACH",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "performance category",
                value: s.to_string(),
                expected: Self::NAMES,
            })
    }
}

/// Membership test for raw performance category strings
pub fn is_performance_category(value: &str) -> bool {
    value.parse::<PerformanceCategory>().is_ok()
}

/// Performance record entity (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub id: i64,
    pub member_id: i64,
    pub category: PerformanceCategory,
    /// 0..=100
    pub score: i64,
    /// 1..=10
    pub rating: i64,
    pub notes: Option<String>,
    pub recorded_at: i64,
    pub created_at: i64,
}

/// Performance record with its member, for category listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceWithMember {
    #[serde(flatten)]
    pub record: PerformanceRecord,
    pub member: MemberBrief,
}

/// Create performance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceCreate {
    pub member_id: i64,
    pub category: String,
    pub score: i64,
    pub rating: i64,
    pub notes: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`; defaults to now
    pub recorded_at: Option<String>,
}

/// Performance listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceQuery {
    pub category: Option<String>,
}
