//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Account role, from highest to lowest privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Role {
    Admin,
    Instructor,
    Member,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Instructor, Role::Member];

    const NAMES: &'static [&'static str] = &["ADMIN", "INSTRUCTOR", "MEMBER"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Instructor => "INSTRUCTOR",
            Role::Member => "MEMBER",
        }
    }

    /// ADMIN and INSTRUCTOR manage the club; MEMBER only sees itself
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Instructor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "INSTRUCTOR" => Ok(Role::Instructor),
            "MEMBER" => Ok(Role::Member),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Membership test for raw role strings
pub fn is_role(value: &str) -> bool {
    value.parse::<Role>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        assert!(is_role("INSTRUCTOR"));
        assert!(!is_role("instructor"));
        assert!(!is_role("OWNER"));
        assert!(!is_role(""));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        let role: Role = serde_json::from_str("\"MEMBER\"").unwrap();
        assert_eq!(role, Role::Member);
    }
}
