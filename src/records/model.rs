// Record types shared by the application/user collections and the analytics
use crate::eligibility::EligibilityRules;
use crate::rbac::Role;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a scheme application
///
/// Flow: pending → under_review → approved | rejected (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// States this one may move to
    pub fn allowed_transitions(&self) -> &'static [ApplicationStatus] {
        match self {
            ApplicationStatus::Pending => &[ApplicationStatus::UnderReview],
            ApplicationStatus::UnderReview => {
                &[ApplicationStatus::Approved, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Approved | ApplicationStatus::Rejected => &[],
        }
    }

    /// Approved or rejected
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "under_review" => Ok(ApplicationStatus::UnderReview),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{}'", other)),
        }
    }
}

/// One step in an application's status history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub updated_by: String,
    #[serde(default)]
    pub remark: String,
    pub date: DateTime<Utc>,
}

/// A citizen's application to a scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub user_id: String,
    pub service_id: String,
    pub service_name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub status: ApplicationStatus,
    pub date_applied: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub form_data: serde_json::Value,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
}

fn default_category() -> String {
    "general".to_string()
}

impl Application {
    /// Whole days between submission and the final decision.
    ///
    /// `None` unless the application is resolved and its history holds both
    /// the pending entry and a decision entry.
    pub fn processing_days(&self) -> Option<i64> {
        if !self.status.is_resolved() {
            return None;
        }

        let submitted = self
            .status_history
            .iter()
            .find(|h| h.status == ApplicationStatus::Pending)?;
        let resolved = self
            .status_history
            .iter()
            .rev()
            .find(|h| h.status.is_resolved())?;

        let millis = (resolved.date - submitted.date).num_milliseconds();
        let days = (millis as f64 / 86_400_000.0).round() as i64;
        Some(days.max(0))
    }
}

/// Account status of a portal user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Blocked,
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "blocked" => Ok(UserStatus::Blocked),
            other => Err(format!("unknown user status '{}'", other)),
        }
    }
}

/// A registered portal user (citizen or admin)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    pub role: Role,
    #[serde(default = "default_language")]
    pub language: String,
    /// State slug, e.g. `tamil-nadu`; `central` for national admins
    #[serde(default)]
    pub state: Option<String>,
    pub status: UserStatus,
    #[serde(default)]
    pub joined_at: Option<NaiveDate>,
}

fn default_language() -> String {
    "en".to_string()
}

/// Whether a scheme is offered to citizens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeStatus {
    #[default]
    Active,
    Inactive,
}

impl SchemeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeStatus::Active => "active",
            SchemeStatus::Inactive => "inactive",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SchemeStatus::Active => SchemeStatus::Inactive,
            SchemeStatus::Inactive => SchemeStatus::Active,
        }
    }
}

impl fmt::Display for SchemeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SchemeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(SchemeStatus::Active),
            "inactive" => Ok(SchemeStatus::Inactive),
            other => Err(format!("unknown scheme status '{}'", other)),
        }
    }
}

/// A welfare scheme or citizen service in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    /// State slug, or `central` for nationwide schemes
    pub state: String,
    /// Human-readable eligibility summary
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub status: SchemeStatus,
    /// Machine-checkable criteria; `None` means open to all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<EligibilityRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Scheme {
    pub fn is_active(&self) -> bool {
        self.status == SchemeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn change(status: ApplicationStatus, day: u32, hour: u32) -> StatusChange {
        StatusChange {
            status,
            updated_by: "system".to_string(),
            remark: String::new(),
            date: Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap(),
        }
    }

    fn application(status: ApplicationStatus, history: Vec<StatusChange>) -> Application {
        let applied = history[0].date;
        Application {
            id: "APP-1".to_string(),
            user_id: "u-1".to_string(),
            service_id: "pm-kisan".to_string(),
            service_name: "PM Kisan Samman Nidhi".to_string(),
            category: "agriculture".to_string(),
            status,
            date_applied: applied,
            last_updated: applied,
            form_data: serde_json::json!({}),
            remarks: String::new(),
            status_history: history,
        }
    }

    #[test]
    fn test_processing_days_rounds() {
        let app = application(
            ApplicationStatus::Approved,
            vec![
                change(ApplicationStatus::Pending, 10, 9),
                change(ApplicationStatus::UnderReview, 15, 10),
                change(ApplicationStatus::Approved, 20, 11),
            ],
        );
        // 10 days and 2 hours
        assert_eq!(app.processing_days(), Some(10));
    }

    #[test]
    fn test_processing_days_requires_resolution() {
        let app = application(
            ApplicationStatus::UnderReview,
            vec![
                change(ApplicationStatus::Pending, 10, 9),
                change(ApplicationStatus::UnderReview, 15, 10),
            ],
        );
        assert_eq!(app.processing_days(), None);

        let no_pending = application(
            ApplicationStatus::Rejected,
            vec![change(ApplicationStatus::Rejected, 10, 9)],
        );
        assert_eq!(no_pending.processing_days(), None);
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&ApplicationStatus::UnderReview).unwrap();
        assert_eq!(json, "\"under_review\"");
        assert_eq!(
            "under-review".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::UnderReview
        );
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            ApplicationStatus::Pending.allowed_transitions(),
            &[ApplicationStatus::UnderReview]
        );
        assert!(ApplicationStatus::Approved.allowed_transitions().is_empty());
    }
}
