//! Role-based access control
//!
//! All permission checks for admin operations go through [`has_permission`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portal role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    ContentAdmin,
    ReviewAdmin,
    User,
}

/// Roles that may sign in to the admin console
pub const ADMIN_ROLES: [Role; 3] = [Role::SuperAdmin, Role::ContentAdmin, Role::ReviewAdmin];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::ContentAdmin => "CONTENT_ADMIN",
            Role::ReviewAdmin => "REVIEW_ADMIN",
            Role::User => "USER",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::ContentAdmin => "Content Admin",
            Role::ReviewAdmin => "Review Admin",
            Role::User => "User",
        }
    }

    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "CONTENT_ADMIN" => Ok(Role::ContentAdmin),
            "REVIEW_ADMIN" => Ok(Role::ReviewAdmin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Admin action subject to permission checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddScheme,
    EditScheme,
    DeleteScheme,
    ApproveApplication,
    RejectApplication,
    ReviewApplication,
    ViewUsers,
    ViewAuditLogs,
    ManageRoles,
    SendNotifications,
    ViewAnalytics,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::AddScheme => "ADD_SCHEME",
            Action::EditScheme => "EDIT_SCHEME",
            Action::DeleteScheme => "DELETE_SCHEME",
            Action::ApproveApplication => "APPROVE_APPLICATION",
            Action::RejectApplication => "REJECT_APPLICATION",
            Action::ReviewApplication => "REVIEW_APPLICATION",
            Action::ViewUsers => "VIEW_USERS",
            Action::ViewAuditLogs => "VIEW_AUDIT_LOGS",
            Action::ManageRoles => "MANAGE_ROLES",
            Action::SendNotifications => "SEND_NOTIFICATIONS",
            Action::ViewAnalytics => "VIEW_ANALYTICS",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn allowed_actions(role: Role) -> &'static [Action] {
    match role {
        Role::SuperAdmin => &[
            Action::AddScheme,
            Action::EditScheme,
            Action::DeleteScheme,
            Action::ApproveApplication,
            Action::RejectApplication,
            Action::ReviewApplication,
            Action::ViewUsers,
            Action::ViewAuditLogs,
            Action::ManageRoles,
            Action::SendNotifications,
            Action::ViewAnalytics,
        ],
        Role::ContentAdmin => &[
            Action::AddScheme,
            Action::EditScheme,
            Action::SendNotifications,
        ],
        Role::ReviewAdmin => &[
            Action::ApproveApplication,
            Action::RejectApplication,
            Action::ReviewApplication,
            Action::ViewAnalytics,
        ],
        Role::User => &[],
    }
}

/// Check if a role has permission for a given action
pub fn has_permission(role: Role, action: Action) -> bool {
    allowed_actions(role).contains(&action)
}

/// Fail with `PermissionDenied` unless `role` may perform `action`
pub fn require(role: Role, action: Action) -> crate::Result<()> {
    if has_permission(role, action) {
        Ok(())
    } else {
        Err(crate::SarthiError::PermissionDenied {
            role: role.to_string(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_matrix() {
        assert!(has_permission(Role::SuperAdmin, Action::ViewAuditLogs));
        assert!(has_permission(Role::ReviewAdmin, Action::ApproveApplication));
        assert!(!has_permission(Role::ContentAdmin, Action::ApproveApplication));
        assert!(!has_permission(Role::User, Action::ViewAnalytics));
    }

    #[test]
    fn test_require_reports_role_and_action() {
        let err = require(Role::ContentAdmin, Action::ViewAuditLogs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Role CONTENT_ADMIN is not permitted to VIEW_AUDIT_LOGS"
        );
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("REVIEW-ADMIN".parse::<Role>().unwrap(), Role::ReviewAdmin);
        assert!("ROOT".parse::<Role>().is_err());
        assert!(Role::ContentAdmin.is_admin());
        assert!(!Role::User.is_admin());
    }
}
