//! Funnelview - exchange funnel analytics over an upstream histogram API.
//!
//! # API Endpoints
//!
//! - `GET /api/analytics` - Proxy the upstream analytics API
//! - `GET /api/dashboard` - Series, insights, funnel and trends for a window
//! - `GET /api/dashboard/demo` - The same views over the demo dataset
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use funnelview::api::{AppState, router};
use funnelview::config::Config;
use funnelview::data_sources::ExpaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("funnelview=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    info!(?config, "Starting Funnelview server");

    let client = ExpaClient::with_base_url(
        &config.api_url,
        &config.office_id,
        config.access_token.clone(),
    );
    if !client.has_token() {
        warn!("EXPA_ACCESS_TOKEN is not set; live analytics are unavailable");
    }

    let app = router(AppState::new(client));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Funnelview is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
