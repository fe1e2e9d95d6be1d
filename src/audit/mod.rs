//! Append-only log of admin actions
//!
//! Entries are only ever prepended; nothing edits or removes them. The log
//! lives as one JSON array under [`AUDIT_LOGS_KEY`]. An identical
//! `(action, target)` pair recorded again inside the debounce window is
//! dropped, which absorbs double-submits from the UI.

mod entry;

pub use entry::{AuditAction, AuditEntry, LogResult, TargetType};

use crate::clock::Clock;
use crate::error::Result;
use crate::rbac::Role;
use crate::storage::{read_json, write_json, KvStore};
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info};

/// Storage key of the audit collection
pub const AUDIT_LOGS_KEY: &str = "scheme_sarthi_audit_logs";

/// Default debounce window for identical entries
pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 1000;

/// Placeholder stored when an action has no target
const NO_TARGET: &str = "N/A";

#[derive(Clone)]
pub struct AuditLog {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    dedup_window: Duration,
}

impl AuditLog {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv,
            clock,
            dedup_window: Duration::milliseconds(DEFAULT_DEDUP_WINDOW_MS),
        }
    }

    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Write an empty collection if none exists
    pub fn seed(&self) -> Result<bool> {
        if read_json::<Vec<AuditEntry>>(self.kv.as_ref(), AUDIT_LOGS_KEY).is_some() {
            return Ok(false);
        }
        write_json(self.kv.as_ref(), AUDIT_LOGS_KEY, &Vec::<AuditEntry>::new())?;
        Ok(true)
    }

    /// All entries, newest first
    pub fn all(&self) -> Vec<AuditEntry> {
        let mut entries: Vec<AuditEntry> =
            read_json(self.kv.as_ref(), AUDIT_LOGS_KEY).unwrap_or_default();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Record an action.
    ///
    /// An empty `target_id` is stored as `"N/A"`. If the same action on the
    /// same target was recorded less than the debounce window ago, nothing
    /// is written and the result reports a duplicate.
    pub fn log(
        &self,
        action_type: AuditAction,
        performed_by: &str,
        performer_role: Role,
        target_id: &str,
        target_type: TargetType,
        metadata: serde_json::Value,
    ) -> Result<LogResult> {
        let mut entries = self.all();
        let now = self.clock.now();
        let target_id = match target_id.trim() {
            "" => NO_TARGET,
            id => id,
        };

        let duplicate = entries.iter().any(|e| {
            e.action_type == action_type
                && e.target_id == target_id
                && now - e.timestamp < self.dedup_window
        });
        if duplicate {
            debug!("Suppressed duplicate {} on {}", action_type, target_id);
            return Ok(LogResult::rejected("Duplicate log entry"));
        }

        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let entry = AuditEntry {
            id: format!("audit-{}-{}", now.timestamp_millis(), &suffix[..4]),
            action_type,
            performed_by: performed_by.to_string(),
            performer_role,
            target_id: target_id.to_string(),
            target_type,
            metadata,
            timestamp: now,
        };

        entries.insert(0, entry.clone());
        write_json(self.kv.as_ref(), AUDIT_LOGS_KEY, &entries)?;
        info!(
            "Audit: {} by {} ({}) on {} {}",
            action_type, performed_by, performer_role, target_type, target_id
        );
        Ok(LogResult::recorded(entry))
    }

    pub fn by_action_type(&self, action_type: AuditAction) -> Vec<AuditEntry> {
        self.all()
            .into_iter()
            .filter(|e| e.action_type == action_type)
            .collect()
    }

    /// Distinct action types present, in newest-first order of appearance
    pub fn action_types(&self) -> Vec<AuditAction> {
        let mut seen = Vec::new();
        for entry in self.all() {
            if !seen.contains(&entry.action_type) {
                seen.push(entry.action_type);
            }
        }
        seen
    }

    /// Entries visible to `caller`. Only super admins see the log; anyone
    /// else gets an empty list.
    pub fn logs_for(&self, caller: Role, action_type: Option<AuditAction>) -> Vec<AuditEntry> {
        if caller != Role::SuperAdmin {
            return Vec::new();
        }
        match action_type {
            Some(action) => self.by_action_type(action),
            None => self.all(),
        }
    }
}
