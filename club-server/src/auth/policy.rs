//! 访问策略
//!
//! 根据已解析的身份和请求的操作，决定操作是不受限执行、
//! 限定到单个成员执行，还是被拒绝。
//! 每个 (角色, 操作) 组合都有明确结果。

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Role;

use crate::auth::CurrentUser;
use crate::security_log;

/// 受策略控制的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListMembers,
    ReadMember,
    WriteMember,
    DeleteMember,
    ReadAttendance,
    WriteAttendance,
    ReadMemberAttendance,
    ReadPerformance,
    WritePerformance,
    ReadMemberPerformance,
    ReadDashboard,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::ListMembers,
        Operation::ReadMember,
        Operation::WriteMember,
        Operation::DeleteMember,
        Operation::ReadAttendance,
        Operation::WriteAttendance,
        Operation::ReadMemberAttendance,
        Operation::ReadPerformance,
        Operation::WritePerformance,
        Operation::ReadMemberPerformance,
        Operation::ReadDashboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListMembers => "members:list",
            Operation::ReadMember => "members:read",
            Operation::WriteMember => "members:write",
            Operation::DeleteMember => "members:delete",
            Operation::ReadAttendance => "attendance:read",
            Operation::WriteAttendance => "attendance:write",
            Operation::ReadMemberAttendance => "attendance:read_member",
            Operation::ReadPerformance => "performance:read",
            Operation::WritePerformance => "performance:write",
            Operation::ReadMemberPerformance => "performance:read_member",
            Operation::ReadDashboard => "dashboard:read",
        }
    }

    /// 按 id 指向单个成员的操作
    fn targets_member(&self) -> bool {
        matches!(
            self,
            Operation::ReadMember | Operation::ReadMemberAttendance | Operation::ReadMemberPerformance
        )
    }
}

/// 拒绝原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// 该角色不允许执行此操作
    RoleNotPermitted,
    /// MEMBER 账号未关联成员
    NotLinked,
    /// MEMBER 请求他人的记录
    OtherMember,
}

/// 策略决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 不受限执行
    Allowed,
    /// 拒绝
    Denied(DenyReason),
    /// 结果限定为该成员 id
    Scoped(i64),
}

/// 评估策略
///
/// `target` 是按成员读取时指向的成员 id，
/// 其他操作忽略此参数。
pub fn allow(user: &CurrentUser, op: Operation, target: Option<i64>) -> Access {
    match user.role {
        Role::Admin => Access::Allowed,
        Role::Instructor => match op {
            Operation::DeleteMember => Access::Denied(DenyReason::RoleNotPermitted),
            _ => Access::Allowed,
        },
        Role::Member => match op {
            Operation::ReadDashboard => Access::Allowed,
            Operation::ListMembers => match user.member_id {
                Some(own) => Access::Scoped(own),
                None => Access::Denied(DenyReason::NotLinked),
            },
            op if op.targets_member() => match (user.member_id, target) {
                (None, _) => Access::Denied(DenyReason::NotLinked),
                (Some(own), Some(t)) if own == t => Access::Allowed,
                _ => Access::Denied(DenyReason::OtherMember),
            },
            _ => Access::Denied(DenyReason::RoleNotPermitted),
        },
    }
}

/// 评估策略，拒绝时转换为错误
///
/// 结果需限定到单个成员时返回 `Some(member_id)`。
pub fn authorize(user: &CurrentUser, op: Operation, target: Option<i64>) -> AppResult<Option<i64>> {
    match allow(user, op, target) {
        Access::Allowed => Ok(None),
        Access::Scoped(member_id) => Ok(Some(member_id)),
        Access::Denied(reason) => {
            security_log!(
                "WARN",
                "permission_denied",
                user_id = user.id,
                role = user.role.as_str(),
                operation = op.name(),
                reason = format!("{reason:?}")
            );
            Err(denial_error(op, reason))
        }
    }
}

fn denial_error(op: Operation, reason: DenyReason) -> AppError {
    match reason {
        DenyReason::NotLinked => {
            AppError::with_message(ErrorCode::MemberNotLinked, "Member profile not linked")
        }
        DenyReason::OtherMember => {
            AppError::forbidden("Members may only access their own records")
        }
        DenyReason::RoleNotPermitted if op == Operation::DeleteMember => {
            AppError::with_message(ErrorCode::AdminRequired, "Only admins may delete members")
        }
        DenyReason::RoleNotPermitted => {
            AppError::forbidden(format!("Permission denied: {}", op.name()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn user(role: Role, member_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 1,
            email: "u@club.org".into(),
            role,
            member_id,
        }
    }

    #[test]
    fn test_admin_allowed_everything() {
        let admin = user(Role::Admin, None);
        for op in Operation::ALL {
            assert_eq!(allow(&admin, op, Some(42)), Access::Allowed, "{op:?}");
        }
    }

    #[test]
    fn test_instructor_cannot_delete() {
        let instructor = user(Role::Instructor, None);
        for op in Operation::ALL {
            let expected = if op == Operation::DeleteMember {
                Access::Denied(DenyReason::RoleNotPermitted)
            } else {
                Access::Allowed
            };
            assert_eq!(allow(&instructor, op, Some(42)), expected, "{op:?}");
        }
    }

    #[test]
    fn test_linked_member_table() {
        let member = user(Role::Member, Some(3));
        assert_eq!(allow(&member, Operation::ListMembers, None), Access::Scoped(3));
        assert_eq!(allow(&member, Operation::ReadMember, Some(3)), Access::Allowed);
        assert_eq!(
            allow(&member, Operation::ReadMember, Some(4)),
            Access::Denied(DenyReason::OtherMember)
        );
        assert_eq!(
            allow(&member, Operation::ReadMemberAttendance, Some(3)),
            Access::Allowed
        );
        assert_eq!(
            allow(&member, Operation::ReadMemberPerformance, Some(9)),
            Access::Denied(DenyReason::OtherMember)
        );
        assert_eq!(allow(&member, Operation::ReadDashboard, None), Access::Allowed);
        for op in [
            Operation::WriteMember,
            Operation::DeleteMember,
            Operation::ReadAttendance,
            Operation::WriteAttendance,
            Operation::ReadPerformance,
            Operation::WritePerformance,
        ] {
            assert_eq!(
                allow(&member, op, Some(3)),
                Access::Denied(DenyReason::RoleNotPermitted),
                "{op:?}"
            );
        }
    }

    #[test]
    fn test_unlinked_member_denied_on_member_scoped_reads() {
        let member = user(Role::Member, None);
        for op in [
            Operation::ListMembers,
            Operation::ReadMember,
            Operation::ReadMemberAttendance,
            Operation::ReadMemberPerformance,
        ] {
            assert_eq!(
                allow(&member, op, Some(3)),
                Access::Denied(DenyReason::NotLinked),
                "{op:?}"
            );
        }
    }

    #[test]
    fn test_member_target_missing_is_denied() {
        let member = user(Role::Member, Some(3));
        assert_eq!(
            allow(&member, Operation::ReadMember, None),
            Access::Denied(DenyReason::OtherMember)
        );
    }

    #[test]
    fn test_policy_is_total() {
        for role in Role::ALL {
            for member_id in [None, Some(1)] {
                let u = user(role, member_id);
                for op in Operation::ALL {
                    for target in [None, Some(1), Some(2)] {
                        // Every combination yields a decision without panicking
                        let _ = allow(&u, op, target);
                    }
                }
            }
        }
    }

    #[test]
    fn test_authorize_maps_denials_to_forbidden() {
        let unlinked = user(Role::Member, None);
        let err = authorize(&unlinked, Operation::ListMembers, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::MemberNotLinked);
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        let instructor = user(Role::Instructor, None);
        let err = authorize(&instructor, Operation::DeleteMember, Some(1)).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        let linked = user(Role::Member, Some(5));
        assert_eq!(authorize(&linked, Operation::ListMembers, None).unwrap(), Some(5));
        assert_eq!(
            authorize(&user(Role::Admin, None), Operation::ListMembers, None).unwrap(),
            None
        );
    }
}
