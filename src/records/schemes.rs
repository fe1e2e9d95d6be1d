//! Scheme catalog, persisted under [`SCHEMES_KEY`]
//!
//! Names are unique regardless of case. Inactive schemes stay in the
//! catalog but are hidden from citizens.

use super::model::{Scheme, SchemeStatus};
use super::seed;
use crate::clock::Clock;
use crate::eligibility::{EligibilityRules, CENTRAL_STATE};
use crate::error::{Result, SarthiError};
use crate::storage::{read_json, write_json, KvStore};
use std::sync::Arc;

/// Storage key of the scheme catalog
pub const SCHEMES_KEY: &str = "scheme_sarthi_schemes";

/// Fields of a scheme an admin adds. A blank `id` is generated.
#[derive(Debug, Clone, Default)]
pub struct SchemeDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub state: String,
    pub eligibility: String,
    pub documents: Vec<String>,
    pub status: Option<SchemeStatus>,
    pub rules: Option<EligibilityRules>,
}

/// Partial edit; `None` fields are left as they are
#[derive(Debug, Clone, Default)]
pub struct SchemeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub eligibility: Option<String>,
    pub documents: Option<Vec<String>>,
    pub rules: Option<EligibilityRules>,
}

impl SchemeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.state.is_none()
            && self.eligibility.is_none()
            && self.documents.is_none()
            && self.rules.is_none()
    }
}

/// Catalog browsing filter. A state filter also admits nationwide schemes.
#[derive(Debug, Clone, Default)]
pub struct SchemeFilter {
    pub category: Option<String>,
    pub state: Option<String>,
    pub status: Option<SchemeStatus>,
}

impl SchemeFilter {
    pub fn matches(&self, scheme: &Scheme) -> bool {
        if let Some(category) = &self.category {
            if &scheme.category != category {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if &scheme.state != state && scheme.state != CENTRAL_STATE {
                return false;
            }
        }
        if let Some(status) = self.status {
            if scheme.status != status {
                return false;
            }
        }
        true
    }
}

#[derive(Clone)]
pub struct SchemeRecords {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl SchemeRecords {
    pub fn new(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Write the demo catalog if it does not exist yet.
    /// Returns whether anything was written.
    pub fn seed(&self) -> Result<bool> {
        if read_json::<Vec<Scheme>>(self.kv.as_ref(), SCHEMES_KEY).is_some() {
            return Ok(false);
        }
        let schemes = seed::schemes();
        write_json(self.kv.as_ref(), SCHEMES_KEY, &schemes)?;
        tracing::info!("Seeded {} schemes", schemes.len());
        Ok(true)
    }

    pub fn all(&self) -> Vec<Scheme> {
        read_json(self.kv.as_ref(), SCHEMES_KEY).unwrap_or_default()
    }

    /// Schemes citizens can see and apply for
    pub fn active(&self) -> Vec<Scheme> {
        self.all().into_iter().filter(Scheme::is_active).collect()
    }

    pub fn by_id(&self, id: &str) -> Option<Scheme> {
        self.all().into_iter().find(|s| s.id == id)
    }

    pub fn require(&self, id: &str) -> Result<Scheme> {
        self.by_id(id).ok_or_else(|| not_found(id))
    }

    pub fn add(&self, draft: SchemeDraft) -> Result<Scheme> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SarthiError::Workflow("Scheme name is required".to_string()));
        }

        let mut all = self.all();
        if name_taken(&all, name, None) {
            return Err(duplicate_name());
        }

        let now = self.clock.now();
        let id = match draft.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("scheme-{}", now.timestamp_millis()),
        };
        if all.iter().any(|s| s.id == id) {
            return Err(SarthiError::Workflow(format!(
                "A scheme with id {} already exists",
                id
            )));
        }

        let scheme = Scheme {
            id,
            name: name.to_string(),
            description: draft.description,
            category: draft.category,
            state: if draft.state.trim().is_empty() {
                CENTRAL_STATE.to_string()
            } else {
                draft.state
            },
            eligibility: draft.eligibility,
            documents: draft.documents,
            status: draft.status.unwrap_or_default(),
            rules: draft.rules,
            created_at: Some(now),
            updated_at: None,
        };

        all.push(scheme.clone());
        write_json(self.kv.as_ref(), SCHEMES_KEY, &all)?;
        tracing::info!("Scheme {} added", scheme.id);
        Ok(scheme)
    }

    pub fn update(&self, id: &str, changes: SchemeUpdate) -> Result<Scheme> {
        let mut all = self.all();
        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(SarthiError::Workflow("Scheme name is required".to_string()));
            }
            if name_taken(&all, name.trim(), Some(id)) {
                return Err(duplicate_name());
            }
        }

        let scheme = all
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = changes.name {
            scheme.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            scheme.description = description;
        }
        if let Some(category) = changes.category {
            scheme.category = category;
        }
        if let Some(state) = changes.state {
            scheme.state = state;
        }
        if let Some(eligibility) = changes.eligibility {
            scheme.eligibility = eligibility;
        }
        if let Some(documents) = changes.documents {
            scheme.documents = documents;
        }
        if let Some(rules) = changes.rules {
            scheme.rules = Some(rules);
        }
        scheme.updated_at = Some(self.clock.now());

        let updated = scheme.clone();
        write_json(self.kv.as_ref(), SCHEMES_KEY, &all)?;
        tracing::info!("Scheme {} updated", id);
        Ok(updated)
    }

    /// Delete a scheme and return what was removed
    pub fn remove(&self, id: &str) -> Result<Scheme> {
        let mut all = self.all();
        let index = all
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        let removed = all.remove(index);
        write_json(self.kv.as_ref(), SCHEMES_KEY, &all)?;
        tracing::info!("Scheme {} removed", id);
        Ok(removed)
    }

    /// Flip between active and inactive
    pub fn toggle_status(&self, id: &str) -> Result<Scheme> {
        let mut all = self.all();
        let scheme = all
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found(id))?;

        scheme.status = scheme.status.toggled();
        scheme.updated_at = Some(self.clock.now());

        let updated = scheme.clone();
        write_json(self.kv.as_ref(), SCHEMES_KEY, &all)?;
        tracing::info!("Scheme {} is now {}", id, updated.status);
        Ok(updated)
    }

    /// Case-insensitive substring search over name, description, category
    /// and the eligibility summary
    pub fn search(&self, query: &str) -> Vec<Scheme> {
        let query = query.trim().to_lowercase();
        self.all()
            .into_iter()
            .filter(|s| {
                [&s.name, &s.description, &s.category, &s.eligibility]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn filter(&self, filter: &SchemeFilter) -> Vec<Scheme> {
        self.all()
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect()
    }
}

fn name_taken(all: &[Scheme], name: &str, except_id: Option<&str>) -> bool {
    all.iter()
        .any(|s| Some(s.id.as_str()) != except_id && s.name.eq_ignore_ascii_case(name))
}

fn duplicate_name() -> SarthiError {
    SarthiError::Workflow("A scheme with this name already exists".to_string())
}

fn not_found(id: &str) -> SarthiError {
    SarthiError::NotFound {
        kind: "Scheme",
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryKv;
    use chrono::{TimeZone, Utc};

    fn records() -> (SchemeRecords, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap());
        let records = SchemeRecords::new(Arc::new(MemoryKv::new()), Arc::new(clock.clone()));
        records.seed().unwrap();
        (records, clock)
    }

    fn draft(name: &str) -> SchemeDraft {
        SchemeDraft {
            name: name.to_string(),
            description: "Free coaching for competitive exams".to_string(),
            category: "education".to_string(),
            state: "kerala".to_string(),
            ..SchemeDraft::default()
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (records, _) = records();
        assert!(!records.seed().unwrap());
        assert_eq!(records.all().len(), 10);
        assert_eq!(records.active().len(), 10);
    }

    #[test]
    fn test_add_generates_id_and_rejects_duplicates() {
        let (records, clock) = records();

        let scheme = records.add(draft("  Vidya Jyothi  ")).unwrap();
        assert_eq!(scheme.id, format!("scheme-{}", clock.now().timestamp_millis()));
        assert_eq!(scheme.name, "Vidya Jyothi");
        assert_eq!(scheme.status, SchemeStatus::Active);
        assert_eq!(scheme.created_at, Some(clock.now()));
        assert_eq!(records.all().len(), 11);

        let err = records.add(draft("vidya jyothi")).unwrap_err();
        assert_eq!(err.to_string(), "A scheme with this name already exists");

        let taken_id = SchemeDraft {
            id: Some("pm-kisan".to_string()),
            ..draft("Another Scheme")
        };
        assert!(matches!(records.add(taken_id), Err(SarthiError::Workflow(_))));
        assert!(matches!(records.add(draft("   ")), Err(SarthiError::Workflow(_))));
    }

    #[test]
    fn test_blank_state_means_nationwide() {
        let (records, _) = records();
        let scheme = records
            .add(SchemeDraft {
                state: String::new(),
                ..draft("Nationwide Scheme")
            })
            .unwrap();
        assert_eq!(scheme.state, CENTRAL_STATE);
    }

    #[test]
    fn test_update_fields() {
        let (records, clock) = records();
        clock.advance(chrono::Duration::hours(3));

        let updated = records
            .update(
                "mudra-yojana",
                SchemeUpdate {
                    description: Some("Loans up to Rs 20 lakh".to_string()),
                    ..SchemeUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description, "Loans up to Rs 20 lakh");
        assert_eq!(updated.name, "Mudra Yojana");
        assert_eq!(updated.updated_at, Some(clock.now()));
        assert_eq!(records.by_id("mudra-yojana").unwrap(), updated);

        // Renaming to its own name in another case is allowed
        let renamed = records
            .update(
                "mudra-yojana",
                SchemeUpdate {
                    name: Some("MUDRA Yojana".to_string()),
                    ..SchemeUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "MUDRA Yojana");

        let clash = SchemeUpdate {
            name: Some("kisan credit card".to_string()),
            ..SchemeUpdate::default()
        };
        assert!(matches!(
            records.update("mudra-yojana", clash),
            Err(SarthiError::Workflow(_))
        ));
        assert!(matches!(
            records.update("nope", SchemeUpdate::default()),
            Err(SarthiError::NotFound { .. })
        ));
    }

    #[test]
    fn test_toggle_hides_from_citizens() {
        let (records, _) = records();

        let off = records.toggle_status("water-bill").unwrap();
        assert_eq!(off.status, SchemeStatus::Inactive);
        assert_eq!(records.active().len(), 9);
        assert_eq!(records.all().len(), 10);

        let on = records.toggle_status("water-bill").unwrap();
        assert!(on.is_active());
        assert_eq!(records.active().len(), 10);
    }

    #[test]
    fn test_remove() {
        let (records, _) = records();
        let removed = records.remove("atal-pension").unwrap();
        assert_eq!(removed.name, "Atal Pension Yojana");
        assert!(records.by_id("atal-pension").is_none());
        assert!(matches!(
            records.remove("atal-pension"),
            Err(SarthiError::NotFound { .. })
        ));
    }

    #[test]
    fn test_search_and_filter() {
        let (records, _) = records();

        let hits: Vec<String> = records.search("PENSION").into_iter().map(|s| s.id).collect();
        assert_eq!(hits, vec!["atal-pension", "old-age-pension"]);
        assert_eq!(records.search("farmer").len(), 2);

        let agriculture = records.filter(&SchemeFilter {
            category: Some("agriculture".to_string()),
            ..SchemeFilter::default()
        });
        assert_eq!(agriculture.len(), 2);

        // Nationwide schemes show up for every state
        let gujarat = records.filter(&SchemeFilter {
            state: Some("gujarat".to_string()),
            ..SchemeFilter::default()
        });
        assert_eq!(gujarat.len(), 9);
        let maharashtra = records.filter(&SchemeFilter {
            state: Some("maharashtra".to_string()),
            ..SchemeFilter::default()
        });
        assert_eq!(maharashtra.len(), 10);

        records.toggle_status("pm-kisan").unwrap();
        let inactive = records.filter(&SchemeFilter {
            status: Some(SchemeStatus::Inactive),
            ..SchemeFilter::default()
        });
        assert_eq!(inactive.len(), 1);
    }
}
