//! Aggregation over the stored application and user records
//!
//! Every metric is derived on demand from the record collections; nothing
//! is cached or stored separately.

use super::filters::ServiceFilters;
use super::metrics::{
    BucketCount, DropOffStats, FilterOption, FilterOptions, KpiSummary, ProcessingStats,
    SchemeCount, SchemePerformance, StateBreakdown, StatusSlice, TrendPoint,
};
use super::Aggregator;
use crate::clock::Clock;
use crate::eligibility::CENTRAL_STATE;
use crate::error::Result;
use crate::records::applications::percent;
use crate::records::{Application, ApplicationRecords, ApplicationStatus, User, UserRecords};
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use chrono::Duration;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Default look-back for the "active users" KPI
pub const DEFAULT_ACTIVE_WINDOW_DAYS: i64 = 30;

/// State slug used when a user has none (or the user is gone)
const UNKNOWN_STATE: &str = "unknown";

/// Processing-time histogram buckets: label, inclusive min, inclusive max
const PROCESSING_BUCKETS: [(&str, i64, i64); 5] = [
    ("0-2 days", 0, 2),
    ("3-5 days", 3, 5),
    ("6-10 days", 6, 10),
    ("11-15 days", 11, 15),
    ("16+ days", 16, i64::MAX),
];

/// [`Aggregator`] backed by [`ApplicationRecords`] and [`UserRecords`]
pub struct DatasetAggregator {
    applications: ApplicationRecords,
    users: UserRecords,
    clock: Arc<dyn Clock>,
    active_window_days: i64,
    word_start: Regex,
}

impl DatasetAggregator {
    pub fn new(
        applications: ApplicationRecords,
        users: UserRecords,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let word_start = Regex::new(r"\b\w").map_err(anyhow::Error::from)?;

        Ok(Self {
            applications,
            users,
            clock,
            active_window_days: DEFAULT_ACTIVE_WINDOW_DAYS,
            word_start,
        })
    }

    /// Override the "active users" look-back
    pub fn with_active_window(mut self, days: i64) -> Self {
        self.active_window_days = days;
        self
    }

    /// Applications matching every filter, including the user-derived state
    fn filtered(&self, filters: &ServiceFilters) -> Vec<Application> {
        let apps: Vec<Application> = self
            .applications
            .all()
            .into_iter()
            .filter(|a| filters.matches(a))
            .collect();

        match &filters.state {
            Some(state) => {
                // Raw profile state: applicants without one never match
                let states: HashMap<String, String> = self
                    .users
                    .all()
                    .into_iter()
                    .filter_map(|u| u.state.map(|s| (u.id, s)))
                    .collect();
                apps.into_iter()
                    .filter(|a| states.get(&a.user_id) == Some(state))
                    .collect()
            }
            None => apps,
        }
    }

    /// `tamil-nadu` → `Tamil Nadu`
    fn humanize(&self, slug: &str) -> String {
        let spaced = slug.replace('-', " ");
        self.word_start
            .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
            .into_owned()
    }
}

fn user_states(users: &[User]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(users.len());
    for user in users {
        let state = user
            .state
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_STATE.to_string());
        map.insert(user.id.clone(), state);
    }
    map
}

fn rounded_mean(values: &[i64]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some((sum as f64 / values.len() as f64).round() as u32)
}

fn count_status(apps: &[Application], status: ApplicationStatus) -> usize {
    apps.iter().filter(|a| a.status == status).count()
}

/// Group rows in first-seen order, so ties keep a stable order after sorting
struct Grouped<T> {
    index: HashMap<String, usize>,
    rows: Vec<T>,
}

impl<T> Grouped<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.rows.push(init());
                self.index.insert(key.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }
}

impl Aggregator for DatasetAggregator {
    fn kpi_summary(&self, filters: &ServiceFilters) -> Result<KpiSummary> {
        let apps = self.filtered(filters);
        let users = self.users.regular_users();

        let cutoff = self.clock.today() - Duration::days(self.active_window_days);
        let active_users = users
            .iter()
            .filter(|u| u.status == crate::records::UserStatus::Active)
            .filter(|u| u.joined_at.is_some_and(|joined| joined >= cutoff))
            .count();

        let total = apps.len();
        let approved = count_status(&apps, ApplicationStatus::Approved);
        let rejected = count_status(&apps, ApplicationStatus::Rejected);

        let mut schemes: Grouped<SchemeCount> = Grouped::new();
        for app in &apps {
            schemes
                .entry(&app.service_name, || SchemeCount {
                    name: app.service_name.clone(),
                    count: 0,
                })
                .count += 1;
        }
        let most_applied_scheme =
            schemes
                .rows
                .into_iter()
                .fold(None::<SchemeCount>, |best, row| match best {
                    Some(best) if best.count >= row.count => Some(best),
                    _ => Some(row),
                });

        let times: Vec<i64> = apps.iter().filter_map(Application::processing_days).collect();

        Ok(KpiSummary {
            total_users: users.len(),
            active_users,
            total_applications: total,
            approval_rate: percent(approved, total),
            rejection_rate: percent(rejected, total),
            pending_applications: count_status(&apps, ApplicationStatus::Pending),
            most_applied_scheme,
            avg_processing_days: rounded_mean(&times).unwrap_or(0),
        })
    }

    fn application_trends(&self, filters: &ServiceFilters) -> Result<Vec<TrendPoint>> {
        let mut months: BTreeMap<String, TrendPoint> = BTreeMap::new();

        for app in self.filtered(filters) {
            let key = app.date_applied.format("%Y-%m").to_string();
            let point = months.entry(key.clone()).or_insert_with(|| TrendPoint {
                key,
                label: app.date_applied.format("%b %y").to_string(),
                applications: 0,
                approved: 0,
                rejected: 0,
            });
            point.applications += 1;
            match app.status {
                ApplicationStatus::Approved => point.approved += 1,
                ApplicationStatus::Rejected => point.rejected += 1,
                _ => {}
            }
        }

        Ok(months.into_values().collect())
    }

    fn status_distribution(&self, filters: &ServiceFilters) -> Result<Vec<StatusSlice>> {
        let apps = self.filtered(filters);
        let slices = [
            ("Approved", ApplicationStatus::Approved, "#22c55e"),
            ("Rejected", ApplicationStatus::Rejected, "#ef4444"),
            ("Pending", ApplicationStatus::Pending, "#eab308"),
            ("Under Review", ApplicationStatus::UnderReview, "#3b82f6"),
        ];

        Ok(slices
            .into_iter()
            .map(|(name, status, color)| StatusSlice {
                name: name.to_string(),
                value: count_status(&apps, status),
                color: color.to_string(),
            })
            .filter(|slice| slice.value > 0)
            .collect())
    }

    fn top_schemes(&self, filters: &ServiceFilters) -> Result<Vec<SchemePerformance>> {
        struct Tally {
            id: String,
            name: String,
            total: usize,
            approved: usize,
            rejected: usize,
            times: Vec<i64>,
        }

        let mut schemes: Grouped<Tally> = Grouped::new();
        for app in self.filtered(filters) {
            let key = if app.service_id.is_empty() {
                app.service_name.clone()
            } else {
                app.service_id.clone()
            };
            let tally = schemes.entry(&key, || Tally {
                id: key.clone(),
                name: app.service_name.clone(),
                total: 0,
                approved: 0,
                rejected: 0,
                times: Vec::new(),
            });
            tally.total += 1;
            match app.status {
                ApplicationStatus::Approved => tally.approved += 1,
                ApplicationStatus::Rejected => tally.rejected += 1,
                _ => {}
            }
            if let Some(days) = app.processing_days() {
                tally.times.push(days);
            }
        }

        let mut rows: Vec<SchemePerformance> = schemes
            .rows
            .into_iter()
            .map(|t| SchemePerformance {
                approval_rate: percent(t.approved, t.total),
                rejection_rate: percent(t.rejected, t.total),
                avg_processing_days: rounded_mean(&t.times),
                total_applications: t.total,
                id: t.id,
                name: t.name,
            })
            .collect();
        rows.sort_by(|a, b| b.total_applications.cmp(&a.total_applications));
        Ok(rows)
    }

    fn state_distribution(&self, filters: &ServiceFilters) -> Result<Vec<StateBreakdown>> {
        let states = user_states(&self.users.all());
        let mut grouped: Grouped<StateBreakdown> = Grouped::new();

        for app in self.filtered(filters) {
            let state = states
                .get(&app.user_id)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_STATE);
            let row = grouped.entry(state, || StateBreakdown {
                state: state.to_string(),
                total: 0,
                approved: 0,
                rejected: 0,
                pending: 0,
            });
            row.total += 1;
            match app.status {
                ApplicationStatus::Approved => row.approved += 1,
                ApplicationStatus::Rejected => row.rejected += 1,
                _ => row.pending += 1,
            }
        }

        let mut rows = grouped.rows;
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        for row in &mut rows {
            row.state = self.humanize(&row.state);
        }
        Ok(rows)
    }

    fn processing_stats(&self, filters: &ServiceFilters) -> Result<ProcessingStats> {
        let times: Vec<i64> = self
            .filtered(filters)
            .iter()
            .filter_map(Application::processing_days)
            .collect();

        let Some(average) = rounded_mean(&times) else {
            return Ok(ProcessingStats::default());
        };

        let distribution = PROCESSING_BUCKETS
            .iter()
            .map(|&(range, min, max)| BucketCount {
                range: range.to_string(),
                count: times.iter().filter(|&&t| t >= min && t <= max).count(),
            })
            .collect();

        Ok(ProcessingStats {
            average,
            fastest: times.iter().copied().min().unwrap_or(0) as u32,
            slowest: times.iter().copied().max().unwrap_or(0) as u32,
            distribution,
            count: times.len(),
        })
    }

    /// Registration-level metric: filters do not narrow it
    fn drop_off_stats(&self, _filters: &ServiceFilters) -> Result<DropOffStats> {
        let users = self.users.regular_users();
        let applicants: HashSet<String> = {
            let mut set = HashSet::new();
            for app in self.applications.all() {
                set.insert(app.user_id);
            }
            set
        };

        let total = users.len();
        let without = users.iter().filter(|u| !applicants.contains(&u.id)).count();

        Ok(DropOffStats {
            total_registered: total,
            users_with_applications: total - without,
            users_without_applications: without,
            drop_off_rate: percent(without, total),
        })
    }

    fn filter_options(&self) -> Result<FilterOptions> {
        let mut schemes: Grouped<FilterOption> = Grouped::new();
        for app in self.applications.all() {
            schemes.entry(&app.service_id, || FilterOption {
                value: app.service_id.clone(),
                label: if app.service_name.is_empty() {
                    app.service_id.clone()
                } else {
                    app.service_name.clone()
                },
            });
        }

        let states: BTreeSet<String> = user_states(&self.users.all())
            .into_values()
            .filter(|s| s != UNKNOWN_STATE && s != CENTRAL_STATE)
            .collect();

        Ok(FilterOptions {
            scheme_options: schemes.rows,
            state_options: states
                .into_iter()
                .map(|s| FilterOption {
                    label: self.humanize(&s),
                    value: s,
                })
                .collect(),
        })
    }
}
