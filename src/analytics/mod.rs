//! Analytics for the admin dashboard
//!
//! - `filters`: filter selection, date presets, normalized service filters
//! - `metrics`: the per-section payloads and the combined snapshot
//! - `service`: aggregation over the stored records
//! - `store`: filter state holder that recomputes the snapshot on change

pub mod filters;
pub mod metrics;
pub mod service;
pub mod store;

pub use filters::{
    parse_date_preset, DatePreset, DateRange, FilterKey, FilterState, ServiceFilters,
};
pub use metrics::{
    BucketCount, DropOffStats, FilterOption, FilterOptions, KpiSummary, MetricSnapshot,
    ProcessingStats, SchemeCount, SchemePerformance, StateBreakdown, StatusSlice, TrendPoint,
};
pub use service::DatasetAggregator;
pub use store::{AnalyticsStore, FilterAction};

use crate::error::Result;

/// Source of dashboard metrics.
///
/// Each method is a pure function of the filters and the underlying
/// dataset; calling it twice on unchanged data yields equal results.
pub trait Aggregator {
    fn kpi_summary(&self, filters: &ServiceFilters) -> Result<KpiSummary>;
    fn application_trends(&self, filters: &ServiceFilters) -> Result<Vec<TrendPoint>>;
    fn status_distribution(&self, filters: &ServiceFilters) -> Result<Vec<StatusSlice>>;
    fn top_schemes(&self, filters: &ServiceFilters) -> Result<Vec<SchemePerformance>>;
    fn state_distribution(&self, filters: &ServiceFilters) -> Result<Vec<StateBreakdown>>;
    fn processing_stats(&self, filters: &ServiceFilters) -> Result<ProcessingStats>;
    fn drop_off_stats(&self, filters: &ServiceFilters) -> Result<DropOffStats>;
    fn filter_options(&self) -> Result<FilterOptions>;
}
