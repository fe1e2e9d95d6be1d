use chrono::{TimeZone, Utc};
use sarthi::audit::{AuditAction, AuditLog, TargetType};
use sarthi::clock::ManualClock;
use sarthi::eligibility::{self, Criterion, Profile, Verdict};
use sarthi::rbac::{self, Action, Role};
use sarthi::records::{SchemeRecords, SchemeStatus, UserRecords};
use sarthi::storage::StorageManager;
use sarthi::SarthiError;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 2, 10, 11, 0, 0).unwrap(),
    ))
}

#[test]
fn test_toggle_by_content_admin_is_audited() {
    let dir = TempDir::new().unwrap();
    let clock = clock();
    let storage = StorageManager::new(dir.path().to_path_buf(), "sarthi.db").unwrap();
    let kv = storage.kv();

    let users = UserRecords::new(kv.clone());
    let schemes = SchemeRecords::new(kv.clone(), clock.clone());
    let audit = AuditLog::new(kv, clock.clone());
    users.seed().unwrap();
    schemes.seed().unwrap();

    let admin = users.require("u-admin-2").unwrap();
    rbac::require(admin.role, Action::EditScheme).unwrap();
    let scheme = schemes.toggle_status("pm-kisan").unwrap();
    let result = audit
        .log(
            AuditAction::SchemeToggled,
            &admin.id,
            admin.role,
            &scheme.id,
            TargetType::Scheme,
            json!({ "status": scheme.status.as_str() }),
        )
        .unwrap();
    assert!(result.success);

    // Content admins may not delete, reviewers may not edit
    assert!(matches!(
        rbac::require(admin.role, Action::DeleteScheme),
        Err(SarthiError::PermissionDenied { .. })
    ));
    let reviewer = users.require("u-admin-3").unwrap();
    assert!(rbac::require(reviewer.role, Action::EditScheme).is_err());

    let entries = audit.logs_for(Role::SuperAdmin, Some(AuditAction::SchemeToggled));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].target_id, "pm-kisan");
    assert_eq!(entries[0].metadata["status"], "inactive");

    // The toggle survives a reopen
    let reopened = StorageManager::new(dir.path().to_path_buf(), "sarthi.db").unwrap();
    let schemes = SchemeRecords::new(reopened.kv(), clock);
    assert_eq!(
        schemes.by_id("pm-kisan").map(|s| s.status),
        Some(SchemeStatus::Inactive)
    );
    assert_eq!(schemes.active().len(), 9);
}

#[test]
fn test_eligibility_over_active_catalog() {
    let dir = TempDir::new().unwrap();
    let storage = StorageManager::new(dir.path().to_path_buf(), "sarthi.db").unwrap();
    let schemes = SchemeRecords::new(storage.kv(), clock());
    schemes.seed().unwrap();

    let farmer = Profile {
        state: Some("maharashtra".to_string()),
        age: Some(45),
        income: Some(120_000),
        occupation: Some("farmer".to_string()),
        ..Profile::default()
    };
    let results = eligibility::rank(&farmer, &schemes.active());
    assert_eq!(results.len(), 10);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

    let by_id = |id: &str| results.iter().find(|r| r.scheme_id == id).unwrap();
    assert_eq!(by_id("pm-kisan").status, Verdict::FullyEligible);
    assert_eq!(by_id("kisan-credit-card").status, Verdict::FullyEligible);
    assert_eq!(by_id("water-bill").status, Verdict::FullyEligible);
    assert_eq!(by_id("atal-pension").failed, vec![Criterion::Age]);
    assert_eq!(by_id("digital-india-scholarship").status, Verdict::NotEligible);
    assert_eq!(by_id("old-age-pension").score, 0);

    // Deactivated schemes drop out of the evaluation
    schemes.toggle_status("pm-kisan").unwrap();
    let results = eligibility::rank(&farmer, &schemes.active());
    assert!(results.iter().all(|r| r.scheme_id != "pm-kisan"));
}
