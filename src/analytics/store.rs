//! Filter state holder for the analytics dashboard
//!
//! All mutation goes through [`AnalyticsStore::dispatch`]. Every accepted
//! action re-derives the whole [`MetricSnapshot`] from scratch. The filters
//! and the snapshot built from them are swapped in together, so readers
//! never observe a snapshot mixing two filter selections.

use super::filters::{parse_date_preset, DatePreset, FilterKey, FilterState};
use super::metrics::MetricSnapshot;
use super::Aggregator;
use crate::clock::Clock;
use crate::error::{Result, SarthiError};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutation accepted by [`AnalyticsStore::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Set one filter field. A date preset other than `custom` also
    /// replaces the date bounds.
    Set(FilterKey, String),
    /// Switch to a custom window with explicit bounds
    CustomRange { from: NaiveDate, to: NaiveDate },
    /// Restore the default filters
    Reset,
    /// Apply several actions in order and recompute once. If any of
    /// them is rejected, none take effect.
    Batch(Vec<FilterAction>),
    /// Recompute without changing filters
    Load,
}

pub struct AnalyticsStore<A: Aggregator> {
    aggregator: A,
    clock: Arc<dyn Clock>,
    filters: FilterState,
    snapshot: MetricSnapshot,
    is_loading: bool,
    revision: u64,
}

impl<A: Aggregator> AnalyticsStore<A> {
    /// Create a store with default filters and an empty snapshot. Call
    /// [`load_analytics`](Self::load_analytics) to populate it.
    pub fn new(aggregator: A, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            clock,
            filters: FilterState::default(),
            snapshot: MetricSnapshot::default(),
            is_loading: false,
            revision: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn snapshot(&self) -> &MetricSnapshot {
        &self.snapshot
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Number of snapshots published so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn aggregator(&self) -> &A {
        &self.aggregator
    }

    /// Apply an action and recompute.
    ///
    /// The action is applied to a copy of the filters. The copy and its
    /// snapshot replace the current ones only when both succeed, so a
    /// rejected action or a failed recompute leaves the store as it was.
    pub fn dispatch(&mut self, action: FilterAction) -> Result<()> {
        debug!("Dispatching {:?}", action);

        let mut candidate = self.filters.clone();
        apply(&mut candidate, action, self.clock.today())?;
        self.publish(candidate)
    }

    /// Re-derive every metric for the current filters and publish them
    /// together. On failure the previous snapshot stays in place.
    pub fn recompute(&mut self) -> Result<()> {
        self.publish(self.filters.clone())
    }

    fn publish(&mut self, candidate: FilterState) -> Result<()> {
        self.is_loading = true;
        let result = self.build_snapshot(&candidate);
        self.is_loading = false;

        let snapshot = result?;
        self.filters = candidate;
        self.snapshot = snapshot;
        self.revision += 1;
        info!(
            "Analytics snapshot {} published ({} applications)",
            self.revision, self.snapshot.kpi_summary.total_applications
        );
        Ok(())
    }

    fn build_snapshot(&self, state: &FilterState) -> Result<MetricSnapshot> {
        let filters = state.normalized();
        let agg = &self.aggregator;

        Ok(MetricSnapshot {
            kpi_summary: agg.kpi_summary(&filters)?,
            application_trends: agg.application_trends(&filters)?,
            status_distribution: agg.status_distribution(&filters)?,
            top_schemes: agg.top_schemes(&filters)?,
            state_distribution: agg.state_distribution(&filters)?,
            processing_stats: agg.processing_stats(&filters)?,
            drop_off_stats: agg.drop_off_stats(&filters)?,
            filter_options: agg.filter_options()?,
        })
    }

    /// Set a filter by its wire name, e.g. `("datePreset", "30d")`
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        let key: FilterKey = key.parse()?;
        self.dispatch(FilterAction::Set(key, value.to_string()))
    }

    pub fn set_custom_date_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<()> {
        self.dispatch(FilterAction::CustomRange { from, to })
    }

    pub fn reset_filters(&mut self) -> Result<()> {
        self.dispatch(FilterAction::Reset)
    }

    pub fn load_analytics(&mut self) -> Result<()> {
        self.dispatch(FilterAction::Load)
    }
}

fn apply(filters: &mut FilterState, action: FilterAction, today: NaiveDate) -> Result<()> {
    match action {
        FilterAction::Set(key, value) => match key {
            FilterKey::DatePreset => {
                let preset: DatePreset = value.trim().parse()?;
                filters.date_preset = preset;
                if preset != DatePreset::Custom {
                    let range = parse_date_preset(preset, today);
                    filters.date_from = range.date_from;
                    filters.date_to = range.date_to;
                }
            }
            FilterKey::Scheme => filters.scheme = value,
            FilterKey::State => filters.state = value,
            FilterKey::Status => filters.status = value,
        },
        FilterAction::CustomRange { from, to } => {
            if from > to {
                warn!("Rejected inverted date range {} .. {}", from, to);
                return Err(SarthiError::InvalidDateRange { from, to });
            }
            filters.date_preset = DatePreset::Custom;
            filters.date_from = Some(from);
            filters.date_to = Some(to);
        }
        FilterAction::Reset => *filters = FilterState::default(),
        FilterAction::Batch(actions) => {
            for action in actions {
                apply(filters, action, today)?;
            }
        }
        FilterAction::Load => {}
    }
    Ok(())
}
