//! User collection, persisted under [`USERS_KEY`]

use super::model::{User, UserStatus};
use super::seed;
use crate::error::{Result, SarthiError};
use crate::storage::{read_json, write_json, KvStore};
use std::sync::Arc;

/// Storage key of the user collection
pub const USERS_KEY: &str = "scheme_sarthi_users";

#[derive(Clone)]
pub struct UserRecords {
    kv: Arc<dyn KvStore>,
}

impl UserRecords {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Write the demo users if the collection does not exist yet.
    /// Returns whether anything was written.
    pub fn seed(&self) -> Result<bool> {
        if read_json::<Vec<User>>(self.kv.as_ref(), USERS_KEY).is_some() {
            return Ok(false);
        }
        let users = seed::users();
        write_json(self.kv.as_ref(), USERS_KEY, &users)?;
        tracing::info!("Seeded {} users", users.len());
        Ok(true)
    }

    pub fn all(&self) -> Vec<User> {
        read_json(self.kv.as_ref(), USERS_KEY).unwrap_or_default()
    }

    pub fn by_id(&self, id: &str) -> Option<User> {
        self.all().into_iter().find(|u| u.id == id)
    }

    /// Look up a user or fail with `NotFound`
    pub fn require(&self, id: &str) -> Result<User> {
        self.by_id(id).ok_or_else(|| SarthiError::NotFound {
            kind: "User",
            id: id.to_string(),
        })
    }

    pub fn admins(&self) -> Vec<User> {
        self.all().into_iter().filter(|u| u.role.is_admin()).collect()
    }

    /// Citizens only (every non-admin role)
    pub fn regular_users(&self) -> Vec<User> {
        self.all().into_iter().filter(|u| !u.role.is_admin()).collect()
    }

    /// Block or unblock a citizen account
    pub fn set_status(&self, id: &str, status: UserStatus) -> Result<User> {
        let mut all = self.all();
        let user = all
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| SarthiError::NotFound {
                kind: "User",
                id: id.to_string(),
            })?;

        if user.role.is_admin() && status == UserStatus::Blocked {
            return Err(SarthiError::Workflow(
                "Admin accounts cannot be blocked".to_string(),
            ));
        }

        user.status = status;
        let updated = user.clone();
        write_json(self.kv.as_ref(), USERS_KEY, &all)?;
        tracing::info!("User {} is now {:?}", id, status);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;

    fn records() -> UserRecords {
        let records = UserRecords::new(Arc::new(MemoryKv::new()));
        records.seed().unwrap();
        records
    }

    #[test]
    fn test_seed_is_idempotent() {
        let records = records();
        assert!(!records.seed().unwrap());
        assert_eq!(records.all().len(), 13);
    }

    #[test]
    fn test_role_partitions() {
        let records = records();
        assert_eq!(records.admins().len(), 3);
        assert_eq!(records.regular_users().len(), 10);
    }

    #[test]
    fn test_block_citizen_but_not_admin() {
        let records = records();

        let blocked = records.set_status("u-demo-1", UserStatus::Blocked).unwrap();
        assert_eq!(blocked.status, UserStatus::Blocked);
        assert_eq!(
            records.by_id("u-demo-1").unwrap().status,
            UserStatus::Blocked
        );

        assert!(matches!(
            records.set_status("u-admin-1", UserStatus::Blocked),
            Err(SarthiError::Workflow(_))
        ));
        assert!(matches!(
            records.set_status("nobody", UserStatus::Active),
            Err(SarthiError::NotFound { .. })
        ));
    }
}
