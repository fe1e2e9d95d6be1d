//! Application collection, persisted under [`APPLICATIONS_KEY`]
//!
//! Status flow: pending → under_review → approved | rejected. Resolved
//! applications are locked.

use super::model::{Application, ApplicationStatus, StatusChange};
use super::seed;
use crate::clock::Clock;
use crate::error::{Result, SarthiError};
use crate::storage::{read_json, write_json, KvStore};
use serde::Serialize;
use std::sync::Arc;

/// Storage key of the application collection
pub const APPLICATIONS_KEY: &str = "scheme_sarthi_applications";

/// Per-status counts for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub pending: usize,
    pub under_review: usize,
    pub approved: usize,
    pub rejected: usize,
    pub approval_rate: u32,
}

#[derive(Clone)]
pub struct ApplicationRecords {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl ApplicationRecords {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Write the demo applications if the collection does not exist yet.
    /// Returns whether anything was written.
    pub fn seed(&self) -> Result<bool> {
        if read_json::<Vec<Application>>(self.kv.as_ref(), APPLICATIONS_KEY).is_some() {
            return Ok(false);
        }
        let apps = seed::applications();
        write_json(self.kv.as_ref(), APPLICATIONS_KEY, &apps)?;
        tracing::info!("Seeded {} applications", apps.len());
        Ok(true)
    }

    pub fn all(&self) -> Vec<Application> {
        read_json(self.kv.as_ref(), APPLICATIONS_KEY).unwrap_or_default()
    }

    pub fn by_user(&self, user_id: &str) -> Vec<Application> {
        self.all()
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<Application> {
        self.all().into_iter().find(|a| a.id == id)
    }

    /// Submit a new application.
    ///
    /// A user may hold one live application per scheme; only a rejected one
    /// can be re-applied for.
    pub fn create(
        &self,
        user_id: &str,
        service_id: &str,
        service_name: &str,
        category: Option<&str>,
        form_data: serde_json::Value,
    ) -> Result<Application> {
        let mut all = self.all();

        let exists = all.iter().any(|a| {
            a.user_id == user_id
                && a.service_id == service_id
                && a.status != ApplicationStatus::Rejected
        });
        if exists {
            return Err(SarthiError::Workflow(
                "You have already applied for this scheme".to_string(),
            ));
        }

        let now = self.clock.now();
        let app = Application {
            id: format!("APP-{}", now.timestamp_millis()),
            user_id: user_id.to_string(),
            service_id: service_id.to_string(),
            service_name: service_name.to_string(),
            category: category.unwrap_or("general").to_string(),
            status: ApplicationStatus::Pending,
            date_applied: now,
            last_updated: now,
            form_data,
            remarks: String::new(),
            status_history: vec![StatusChange {
                status: ApplicationStatus::Pending,
                updated_by: "system".to_string(),
                remark: "Application submitted".to_string(),
                date: now,
            }],
        };

        all.push(app.clone());
        write_json(self.kv.as_ref(), APPLICATIONS_KEY, &all)?;
        tracing::info!("Application {} submitted by {}", app.id, user_id);
        Ok(app)
    }

    /// pending → under_review
    pub fn move_to_review(&self, id: &str, updated_by: &str) -> Result<Application> {
        self.transition(
            id,
            ApplicationStatus::UnderReview,
            "Picked up for review",
            updated_by,
        )
    }

    /// under_review → approved | rejected. A rejection needs a remark.
    pub fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        remark: &str,
        updated_by: &str,
    ) -> Result<Application> {
        if status == ApplicationStatus::Rejected && remark.trim().is_empty() {
            return Err(SarthiError::Workflow(
                "Rejection requires a remark.".to_string(),
            ));
        }
        self.transition(id, status, remark, updated_by)
    }

    fn transition(
        &self,
        id: &str,
        status: ApplicationStatus,
        remark: &str,
        updated_by: &str,
    ) -> Result<Application> {
        let mut all = self.all();
        let app = all
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SarthiError::NotFound {
                kind: "Application",
                id: id.to_string(),
            })?;

        let allowed = app.status.allowed_transitions();
        if !allowed.contains(&status) {
            let allowed = if allowed.is_empty() {
                "none (terminal state)".to_string()
            } else {
                allowed
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            return Err(SarthiError::Workflow(format!(
                "Cannot transition from \"{}\" to \"{}\". Allowed: {}.",
                app.status, status, allowed
            )));
        }

        let now = self.clock.now();
        let updated_by = if updated_by.is_empty() {
            "system"
        } else {
            updated_by
        };

        app.status = status;
        if !remark.is_empty() {
            app.remarks = remark.to_string();
        }
        app.last_updated = now;
        app.status_history.push(StatusChange {
            status,
            updated_by: updated_by.to_string(),
            remark: remark.to_string(),
            date: now,
        });

        let updated = app.clone();
        write_json(self.kv.as_ref(), APPLICATIONS_KEY, &all)?;
        tracing::info!("Application {} moved to {} by {}", id, status, updated_by);
        Ok(updated)
    }

    pub fn stats(&self) -> ApplicationStats {
        let all = self.all();
        let count = |status: ApplicationStatus| all.iter().filter(|a| a.status == status).count();

        let approved = count(ApplicationStatus::Approved);
        ApplicationStats {
            total: all.len(),
            pending: count(ApplicationStatus::Pending),
            under_review: count(ApplicationStatus::UnderReview),
            approved,
            rejected: count(ApplicationStatus::Rejected),
            approval_rate: percent(approved, all.len()),
        }
    }
}

/// Rounded percentage, 0 when the denominator is empty
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}
