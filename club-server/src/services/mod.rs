//! Identity-aware operations
//!
//! Every operation takes the caller's [`CurrentUser`](crate::auth::CurrentUser)
//! and consults the access policy before touching storage.

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod http;
pub mod members;
pub mod performance;

#[cfg(test)]
pub(crate) mod tests {
    use crate::auth::CurrentUser;
    use shared::models::Role;

    pub fn admin() -> CurrentUser {
        CurrentUser {
            id: 1,
            email: "admin@club.org".into(),
            role: Role::Admin,
            member_id: None,
        }
    }

    pub fn instructor() -> CurrentUser {
        CurrentUser {
            id: 2,
            email: "coach@club.org".into(),
            role: Role::Instructor,
            member_id: None,
        }
    }

    pub fn member_user(member_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 3,
            email: "member@club.org".into(),
            role: Role::Member,
            member_id,
        }
    }
}
