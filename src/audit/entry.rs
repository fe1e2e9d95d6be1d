// Audit entry types
use crate::rbac::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of admin action recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    SchemeCreated,
    SchemeUpdated,
    SchemeDeleted,
    SchemeToggled,
    ApplicationReviewed,
    ApplicationApproved,
    ApplicationRejected,
    UserBlocked,
    UserUnblocked,
    RoleUpdated,
    NotificationBroadcast,
    PasswordChanged,
    MaintenanceToggled,
}

impl AuditAction {
    pub const ALL: [AuditAction; 13] = [
        AuditAction::SchemeCreated,
        AuditAction::SchemeUpdated,
        AuditAction::SchemeDeleted,
        AuditAction::SchemeToggled,
        AuditAction::ApplicationReviewed,
        AuditAction::ApplicationApproved,
        AuditAction::ApplicationRejected,
        AuditAction::UserBlocked,
        AuditAction::UserUnblocked,
        AuditAction::RoleUpdated,
        AuditAction::NotificationBroadcast,
        AuditAction::PasswordChanged,
        AuditAction::MaintenanceToggled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SchemeCreated => "SCHEME_CREATED",
            AuditAction::SchemeUpdated => "SCHEME_UPDATED",
            AuditAction::SchemeDeleted => "SCHEME_DELETED",
            AuditAction::SchemeToggled => "SCHEME_TOGGLED",
            AuditAction::ApplicationReviewed => "APPLICATION_REVIEWED",
            AuditAction::ApplicationApproved => "APPLICATION_APPROVED",
            AuditAction::ApplicationRejected => "APPLICATION_REJECTED",
            AuditAction::UserBlocked => "USER_BLOCKED",
            AuditAction::UserUnblocked => "USER_UNBLOCKED",
            AuditAction::RoleUpdated => "ROLE_UPDATED",
            AuditAction::NotificationBroadcast => "NOTIFICATION_BROADCAST",
            AuditAction::PasswordChanged => "PASSWORD_CHANGED",
            AuditAction::MaintenanceToggled => "MAINTENANCE_TOGGLED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| format!("unknown audit action '{}'", s))
    }
}

/// Kind of entity an action touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Scheme,
    Application,
    User,
    #[default]
    System,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Scheme => "scheme",
            TargetType::Application => "application",
            TargetType::User => "user",
            TargetType::System => "system",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheme" => Ok(TargetType::Scheme),
            "application" => Ok(TargetType::Application),
            "user" => Ok(TargetType::User),
            "system" => Ok(TargetType::System),
            other => Err(format!("unknown target type '{}'", other)),
        }
    }
}

/// One immutable record of an admin action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub action_type: AuditAction,
    pub performed_by: String,
    pub performer_role: Role,
    pub target_id: String,
    #[serde(default)]
    pub target_type: TargetType,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of [`AuditLog::log`](super::AuditLog::log). A suppressed
/// duplicate is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<AuditEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogResult {
    pub(crate) fn recorded(entry: AuditEntry) -> Self {
        Self {
            success: true,
            entry: Some(entry),
            error: None,
        }
    }

    pub(crate) fn rejected(reason: &str) -> Self {
        Self {
            success: false,
            entry: None,
            error: Some(reason.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_action_names() {
        for action in AuditAction::ALL {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
        assert_eq!(
            "application-approved".parse::<AuditAction>().unwrap(),
            AuditAction::ApplicationApproved
        );
        assert!("SCHEME_ARCHIVED".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = AuditEntry {
            id: "audit-1-abcd".to_string(),
            action_type: AuditAction::UserBlocked,
            performed_by: "admin-super-1".to_string(),
            performer_role: Role::SuperAdmin,
            target_id: "u-demo-4".to_string(),
            target_type: TargetType::User,
            metadata: serde_json::json!({ "reason": "spam" }),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["actionType"], "USER_BLOCKED");
        assert_eq!(json["performerRole"], "SUPER_ADMIN");
        assert_eq!(json["targetType"], "user");
        assert_eq!(json["metadata"]["reason"], "spam");

        let back: AuditEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
