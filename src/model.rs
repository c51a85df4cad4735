//! Data models for Funnelview.
//!
//! Two families of types live here:
//!
//! - **Wire types** mirroring the upstream analytics API (`AnalyticsResponse`,
//!   `AnalyticsMetric`, `AnalyticsBucket`). They are produced only by the
//!   upstream service and treated as immutable once received.
//! - **Derived types** computed per request by [`crate::aggregation`] and
//!   [`crate::insights`] (`ChartDataPoint`, `TrendAnalysis`, `AnalyticsInsight`,
//!   `FunnelStage`, ...). None of them is stored anywhere.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default start of the reporting window when the caller omits `start_date`.
pub const DEFAULT_START_DATE: &str = "2024-07-01";

/// Default end of the reporting window when the caller omits `end_date`.
pub const DEFAULT_END_DATE: &str = "2025-06-30";

/// Colour used for metric keys outside the catalogue.
pub const FALLBACK_COLOR: &str = "#6b7280";

/// The metrics reported by the upstream analytics API.
///
/// Declaration order is the catalogue order used by trend tables and
/// funnel-adjacent views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    #[serde(rename = "total_signup")]
    Signup,
    #[serde(rename = "total_matched")]
    Matched,
    #[serde(rename = "total_applications")]
    Applications,
    #[serde(rename = "total_an_accepted")]
    AnAccepted,
    #[serde(rename = "total_approvals")]
    Approvals,
    #[serde(rename = "total_realized")]
    Realized,
    #[serde(rename = "total_finished")]
    Finished,
    #[serde(rename = "total_completed")]
    Completed,
    #[serde(rename = "total_remote_realized")]
    RemoteRealized,
}

impl MetricKind {
    /// Every metric, in catalogue order.
    pub const ALL: [MetricKind; 9] = [
        MetricKind::Signup,
        MetricKind::Matched,
        MetricKind::Applications,
        MetricKind::AnAccepted,
        MetricKind::Approvals,
        MetricKind::Realized,
        MetricKind::Finished,
        MetricKind::Completed,
        MetricKind::RemoteRealized,
    ];

    /// The upstream field name, also used as the series key on chart points.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Signup => "total_signup",
            MetricKind::Matched => "total_matched",
            MetricKind::Applications => "total_applications",
            MetricKind::AnAccepted => "total_an_accepted",
            MetricKind::Approvals => "total_approvals",
            MetricKind::Realized => "total_realized",
            MetricKind::Finished => "total_finished",
            MetricKind::Completed => "total_completed",
            MetricKind::RemoteRealized => "total_remote_realized",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Signup => "Sign-ups",
            MetricKind::Matched => "Matched",
            MetricKind::Applications => "Applications",
            MetricKind::AnAccepted => "Accepted by Host",
            MetricKind::Approvals => "Approvals",
            MetricKind::Realized => "Realized",
            MetricKind::Finished => "Finished",
            MetricKind::Completed => "Completed",
            MetricKind::RemoteRealized => "Remote Realized",
        }
    }

    /// Display colour for charts.
    pub fn color(&self) -> &'static str {
        match self {
            MetricKind::Signup => "#6366f1",
            MetricKind::Matched => "#8b5cf6",
            MetricKind::Applications => "#3b82f6",
            MetricKind::AnAccepted => "#10b981",
            MetricKind::Approvals => "#06b6d4",
            MetricKind::Realized => "#f59e0b",
            MetricKind::Finished => "#ef4444",
            MetricKind::Completed => "#22c55e",
            MetricKind::RemoteRealized => "#ec4899",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::Signup => "Total number of new sign-ups",
            MetricKind::Matched => "Applications that have been matched with opportunities",
            MetricKind::Applications => "Total number of applications submitted",
            MetricKind::AnAccepted => "Applications accepted by host organization",
            MetricKind::Approvals => "Applications that have been approved",
            MetricKind::Realized => "Exchanges that have been realized (started)",
            MetricKind::Finished => "Exchanges that have been finished",
            MetricKind::Completed => "Exchanges that have been completed successfully",
            MetricKind::RemoteRealized => "Remote exchanges that have been realized",
        }
    }

    /// Look a metric up by its upstream field name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Label for any series key, falling back to a prettified key.
///
/// Unknown keys lose their `total_` prefix and have their first underscore
/// replaced by a space (`total_foo_bar` becomes `foo bar`).
pub fn metric_label(key: &str) -> String {
    match MetricKind::from_key(key) {
        Some(kind) => kind.label().to_string(),
        None => key.replacen("total_", "", 1).replacen('_', " ", 1),
    }
}

/// Colour for any series key.
pub fn metric_color(key: &str) -> &'static str {
    MetricKind::from_key(key)
        .map(|kind| kind.color())
        .unwrap_or(FALLBACK_COLOR)
}

// ============================================================================
// Upstream wire types
// ============================================================================

/// A single time-bucketed count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsBucket {
    /// Period start as an ISO date string (e.g. "2024-07-01").
    pub key_as_string: String,

    /// The same instant as epoch milliseconds.
    pub key: i64,

    /// Number of records in this period.
    pub doc_count: u64,
}

/// A list of buckets under one of the upstream collection names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCollection {
    #[serde(default)]
    pub buckets: Vec<AnalyticsBucket>,
}

/// A named aggregate: a total plus an optional time-bucketed breakdown.
///
/// The upstream schema files person-based metrics (sign-ups) under `people`
/// and everything else under `applications`. Both are kept as separate
/// optional fields; see [`AnalyticsMetric::buckets`] for the resolution rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsMetric {
    #[serde(default)]
    pub doc_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<BucketCollection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<BucketCollection>,
}

impl AnalyticsMetric {
    /// The bucket breakdown: `applications` if present, else `people`, else empty.
    ///
    /// A present-but-empty `applications` collection still wins over `people`.
    pub fn buckets(&self) -> &[AnalyticsBucket] {
        self.applications
            .as_ref()
            .or(self.people.as_ref())
            .map(|collection| collection.buckets.as_slice())
            .unwrap_or(&[])
    }
}

/// The per-metric payload under the top-level `analytics` key.
///
/// Any metric may be missing. Unknown metric names are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_signup: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_matched: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_applications: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_an_accepted: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_approvals: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_realized: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_finished: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_completed: Option<AnalyticsMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_remote_realized: Option<AnalyticsMetric>,
}

impl AnalyticsMetrics {
    fn slot(&self, kind: MetricKind) -> &Option<AnalyticsMetric> {
        match kind {
            MetricKind::Signup => &self.total_signup,
            MetricKind::Matched => &self.total_matched,
            MetricKind::Applications => &self.total_applications,
            MetricKind::AnAccepted => &self.total_an_accepted,
            MetricKind::Approvals => &self.total_approvals,
            MetricKind::Realized => &self.total_realized,
            MetricKind::Finished => &self.total_finished,
            MetricKind::Completed => &self.total_completed,
            MetricKind::RemoteRealized => &self.total_remote_realized,
        }
    }

    fn slot_mut(&mut self, kind: MetricKind) -> &mut Option<AnalyticsMetric> {
        match kind {
            MetricKind::Signup => &mut self.total_signup,
            MetricKind::Matched => &mut self.total_matched,
            MetricKind::Applications => &mut self.total_applications,
            MetricKind::AnAccepted => &mut self.total_an_accepted,
            MetricKind::Approvals => &mut self.total_approvals,
            MetricKind::Realized => &mut self.total_realized,
            MetricKind::Finished => &mut self.total_finished,
            MetricKind::Completed => &mut self.total_completed,
            MetricKind::RemoteRealized => &mut self.total_remote_realized,
        }
    }
}

/// Response body of the upstream analytics API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub analytics: AnalyticsMetrics,
}

impl AnalyticsResponse {
    /// Get a metric if the upstream reported it.
    pub fn metric(&self, kind: MetricKind) -> Option<&AnalyticsMetric> {
        self.analytics.slot(kind).as_ref()
    }

    /// Total count for a metric; absent metrics count as zero.
    pub fn doc_count(&self, kind: MetricKind) -> u64 {
        self.metric(kind).map(|m| m.doc_count).unwrap_or(0)
    }

    /// Present metrics in catalogue order.
    pub fn metrics(&self) -> impl Iterator<Item = (MetricKind, &AnalyticsMetric)> {
        MetricKind::ALL
            .into_iter()
            .filter_map(move |kind| self.metric(kind).map(|m| (kind, m)))
    }

    /// Set or replace a metric.
    pub fn with_metric(mut self, kind: MetricKind, metric: AnalyticsMetric) -> Self {
        *self.analytics.slot_mut(kind) = Some(metric);
        self
    }
}

// ============================================================================
// Derived chart and KPI types
// ============================================================================

/// One row of the merged time series.
///
/// Series values are keyed by metric key. A metric with no bucket for this
/// date has no entry at all; it is not zero-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// The raw upstream date string.
    pub date: String,

    /// Display label, e.g. "Jul 2024".
    pub formatted_date: String,

    #[serde(flatten)]
    pub values: BTreeMap<String, u64>,
}

impl ChartDataPoint {
    pub fn value(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    /// The series value, coalescing a missing entry to zero.
    pub fn value_or_zero(&self, key: &str) -> u64 {
        self.value(key).unwrap_or(0)
    }
}

/// Direction of a metric over the reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Second-half average more than 5% above the first half.
    Increasing,
    /// Second-half average more than 5% below the first half.
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Classify a percent change using the ±5% band.
    pub fn from_percent_change(percent_change: f64) -> Self {
        if percent_change > 5.0 {
            TrendDirection::Increasing
        } else if percent_change < -5.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extreme value of a series with the display date it first occurred on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesExtremum {
    pub value: u64,
    pub date: String,
}

/// Trend summary for one metric over one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub metric: String,
    pub trend: TrendDirection,
    /// Second-half vs first-half average change, one decimal place.
    pub percent_change: f64,
    /// Mean over the whole series, rounded to the nearest integer.
    pub average: u64,
    pub max: SeriesExtremum,
    pub min: SeriesExtremum,
}

/// Classification of a KPI insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Negative,
    Neutral,
    Warning,
}

/// Display value of an insight: preformatted text or a raw count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InsightValue {
    Text(String),
    Count(u64),
}

/// A derived, human-readable KPI statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,

    pub title: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<InsightValue>,

    /// Signed percent change, for trend-based insights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,

    /// The formula with the literal operands substituted in. Display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

/// One step of the application funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub value: u64,
    pub color: String,
}

/// Conversion between two consecutive funnel stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageConversion {
    pub from: String,
    pub to: String,
    /// `to / from * 100`, one decimal place; 0 when `from` is empty.
    pub rate: f64,
    pub color: String,
}

/// A slice of the pipeline distribution (records currently sitting in a stage).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSegment {
    pub name: String,
    pub value: u64,
    /// Share of total applications, one decimal place.
    pub share: f64,
    pub color: String,
}

/// Short-term direction shown on a headline metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTrend {
    Up,
    Down,
    Stable,
}

/// A headline metric card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub metric: MetricKind,
    pub label: String,
    pub description: String,
    pub color: String,
    pub total: u64,
    pub trend: CardTrend,
    /// Whole-number percent change of the last three periods vs the three before.
    pub change: i64,
}

/// Per-period conversion rates for the comparative chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRates {
    pub date: String,
    pub formatted_date: String,
    pub match_rate: f64,
    pub realization_rate: f64,
    pub completion_rate: f64,
}

// ============================================================================
// Query types
// ============================================================================

/// Histogram bucket width requested from upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
            Interval::Quarter => "quarter",
            Interval::Year => "year",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for GET /api/analytics and GET /api/dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    /// Start of the reporting window (default: 2024-07-01).
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// End of the reporting window (default: 2025-06-30).
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Bucket width (default: month).
    #[serde(default)]
    pub interval: Interval,
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            interval: Interval::default(),
        }
    }
}

fn default_start_date() -> String {
    DEFAULT_START_DATE.to_string()
}

fn default_end_date() -> String {
    DEFAULT_END_DATE.to_string()
}
