//! HTTP API handlers for Funnelview.
//!
//! - **GET /api/analytics**: proxies the upstream analytics API, adding the
//!   office and access token held by the server.
//! - **GET /api/dashboard**: every derived view for a window, with demo-data
//!   fallback when upstream is unavailable.
//! - **GET /api/dashboard/demo**: the same views over the demo dataset.
//! - **GET /health**: liveness.
//!
//! # Secrets
//!
//! The access token never appears in responses, spans or log lines.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::dashboard::{Dashboard, DashboardResponse};
use crate::data_sources::ExpaClient;
use crate::error::{AnalyticsError, ProxyError};
use crate::model::AnalyticsQuery;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
}

impl AppState {
    pub fn new(client: ExpaClient) -> Self {
        Self {
            dashboard: Dashboard::new(client),
        }
    }
}

/// Build the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analytics", get(get_analytics))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/demo", get(get_demo_dashboard))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// GET /api/analytics - Proxy the upstream analytics API.
///
/// # Query Parameters
///
/// - `start_date` (optional): default `2024-07-01`
/// - `end_date` (optional): default `2025-06-30`
/// - `interval` (optional): day, week, month, quarter or year (default: month)
///
/// # Response
///
/// The upstream JSON body, verbatim:
///
/// ```json
/// {
///     "analytics": {
///         "total_applications": {
///             "doc_count": 25925,
///             "applications": { "buckets": [
///                 { "key_as_string": "2024-07-01", "key": 1719792000000, "doc_count": 1847 }
///             ]}
///         }
///     }
/// }
/// ```
///
/// Failures answer `{"error": ..., "details": ...}` with the upstream status,
/// or 500 when the token is unconfigured or the upstream is unreachable.
#[instrument(skip(state))]
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, ProxyError> {
    match state.dashboard.client().fetch_raw(&query).await {
        Ok(body) => {
            info!(
                start_date = %query.start_date,
                end_date = %query.end_date,
                interval = %query.interval,
                "Analytics proxied"
            );
            Ok(([(header::CACHE_CONTROL, "no-store")], Json(body)))
        }
        Err(e) => {
            warn!(
                status = e.status().as_u16(),
                error = %e,
                "Failed to proxy analytics"
            );
            Err(e)
        }
    }
}

/// GET /api/dashboard - Series, insights, funnel and trends for a window.
///
/// Takes the same query parameters as `/api/analytics`. Always answers 200
/// unless upstream returned malformed bucket dates (502); fetch failures
/// fall back to demo data with `is_demo_data: true` and an `error` message.
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<DashboardResponse>, AnalyticsError> {
    match state.dashboard.load(&query).await {
        Ok(view) => {
            info!(
                is_demo_data = view.is_demo_data,
                points = view.series.len(),
                "Dashboard queried"
            );
            Ok(Json(view))
        }
        Err(e) => {
            warn!(error = %e, "Upstream returned malformed analytics");
            Err(e)
        }
    }
}

/// GET /api/dashboard/demo - Dashboard over the built-in demo dataset.
#[instrument(skip(state))]
pub async fn get_demo_dashboard(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<DashboardResponse>, AnalyticsError> {
    state.dashboard.demo(&query, None).map(Json)
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
