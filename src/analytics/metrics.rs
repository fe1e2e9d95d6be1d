// Metric payloads produced by the aggregator, one per dashboard section
use serde::Serialize;

/// Most-applied scheme and its application count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeCount {
    pub name: String,
    pub count: usize,
}

/// Headline counters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_users: usize,
    /// Active citizens who joined within the active-user window
    pub active_users: usize,
    pub total_applications: usize,
    pub approval_rate: u32,
    pub rejection_rate: u32,
    pub pending_applications: usize,
    pub most_applied_scheme: Option<SchemeCount>,
    pub avg_processing_days: u32,
}

/// Monthly application counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// `YYYY-MM`, the sort key
    pub key: String,
    /// e.g. `Jan 26`
    pub label: String,
    pub applications: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Donut-chart slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// Per-scheme performance row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemePerformance {
    pub id: String,
    pub name: String,
    pub total_applications: usize,
    pub approval_rate: u32,
    pub rejection_rate: u32,
    pub avg_processing_days: Option<u32>,
}

/// Per-state stacked bar; `pending` counts everything not yet resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateBreakdown {
    pub state: String,
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub range: String,
    pub count: usize,
}

/// Processing-time analysis over resolved applications
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessingStats {
    pub average: u32,
    pub fastest: u32,
    pub slowest: u32,
    pub distribution: Vec<BucketCount>,
    pub count: usize,
}

/// Registered citizens who never applied
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffStats {
    pub total_registered: usize,
    pub users_with_applications: usize,
    pub users_without_applications: usize,
    pub drop_off_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Choices offered by the filter panel
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub scheme_options: Vec<FilterOption>,
    pub state_options: Vec<FilterOption>,
}

/// Everything the dashboard renders, computed together from one filter
/// selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub kpi_summary: KpiSummary,
    pub application_trends: Vec<TrendPoint>,
    pub status_distribution: Vec<StatusSlice>,
    pub top_schemes: Vec<SchemePerformance>,
    pub state_distribution: Vec<StateBreakdown>,
    pub processing_stats: ProcessingStats,
    pub drop_off_stats: DropOffStats,
    pub filter_options: FilterOptions,
}
