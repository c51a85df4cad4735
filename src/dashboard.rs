//! Dashboard assembly: one fetch, every derived view.
//!
//! The dashboard never leaves the caller with nothing to show. When the
//! upstream fetch fails for any reason the built-in demo dataset is used
//! instead, flagged with `is_demo_data` and the failure message.
//!
//! # Usage
//!
//! ```ignore
//! let dashboard = Dashboard::new(ExpaClient::new("1552", Some(token)));
//! let view = dashboard.load(&AnalyticsQuery::default()).await?;
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregation::{
    calculate_all_trends, calculate_distribution, calculate_funnel_data, calculate_metric_cards,
    calculate_period_rates, calculate_stage_conversions, transform_analytics_data,
};
use crate::data_sources::ExpaClient;
use crate::demo::demo_response;
use crate::error::AnalyticsError;
use crate::insights::generate_insights;
use crate::model::{
    AnalyticsInsight, AnalyticsQuery, AnalyticsResponse, ChartDataPoint, DistributionSegment,
    FunnelStage, MetricCard, PeriodRates, StageConversion, TrendAnalysis,
};

/// Every view of one reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    /// When the response was generated.
    pub generated_at: DateTime<Utc>,

    /// The window that was requested.
    pub filters: AnalyticsQuery,

    /// True when the views were computed over the demo dataset.
    pub is_demo_data: bool,

    /// Why live data could not be shown, if it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub series: Vec<ChartDataPoint>,
    pub insights: Vec<AnalyticsInsight>,
    pub funnel: Vec<FunnelStage>,
    pub stage_conversions: Vec<StageConversion>,
    pub distribution: Vec<DistributionSegment>,
    pub trends: Vec<TrendAnalysis>,
    pub metric_cards: Vec<MetricCard>,
    pub period_rates: Vec<PeriodRates>,
}

impl DashboardResponse {
    /// Compute every view from an analytics response.
    ///
    /// # Errors
    ///
    /// Fails only if a bucket date cannot be parsed.
    pub fn build(
        response: &AnalyticsResponse,
        filters: AnalyticsQuery,
        is_demo_data: bool,
        error: Option<String>,
    ) -> Result<Self, AnalyticsError> {
        let series = transform_analytics_data(response)?;
        let funnel = calculate_funnel_data(response);

        Ok(Self {
            generated_at: Utc::now(),
            filters,
            is_demo_data,
            error,
            insights: generate_insights(&series, response),
            stage_conversions: calculate_stage_conversions(&funnel),
            distribution: calculate_distribution(response),
            trends: calculate_all_trends(&series),
            metric_cards: calculate_metric_cards(response),
            period_rates: calculate_period_rates(&series),
            funnel,
            series,
        })
    }
}

/// Fetches analytics and assembles dashboard views.
#[derive(Clone)]
pub struct Dashboard {
    client: ExpaClient,
}

impl Dashboard {
    pub fn new(client: ExpaClient) -> Self {
        Self { client }
    }

    /// The upstream client used for live data.
    pub fn client(&self) -> &ExpaClient {
        &self.client
    }

    /// Build the dashboard for a window, falling back to demo data on fetch failure.
    ///
    /// # Errors
    ///
    /// Only a malformed upstream payload (unparseable bucket date) is an
    /// error; fetch failures are reported inside the response.
    pub async fn load(&self, query: &AnalyticsQuery) -> Result<DashboardResponse, AnalyticsError> {
        match self.client.fetch_analytics(query).await {
            Ok(response) => {
                let view = DashboardResponse::build(&response, query.clone(), false, None)?;
                info!(
                    points = view.series.len(),
                    insights = view.insights.len(),
                    "Dashboard built from live data"
                );
                Ok(view)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    status = e.status().as_u16(),
                    "Analytics fetch failed, falling back to demo data"
                );
                self.demo(query, Some(e.to_string()))
            }
        }
    }

    /// Build the dashboard over the demo dataset.
    pub fn demo(
        &self,
        query: &AnalyticsQuery,
        error: Option<String>,
    ) -> Result<DashboardResponse, AnalyticsError> {
        DashboardResponse::build(&demo_response(), query.clone(), true, error)
    }
}
