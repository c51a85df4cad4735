//! Client for the upstream exchange analytics API.
//!
//! The API returns per-metric totals plus a date histogram for a single
//! office, e.g.:
//!
//! ```text
//! GET https://analytics.api.aiesec.org/v2/applications/analyze.json
//!     ?histogram[office_id]=1552&start_date=2024-07-01&end_date=2025-06-30
//!     &histogram[interval]=month&access_token=...
//! ```
//!
//! # Secrets
//!
//! The access token travels as a query parameter, so request URLs are never
//! logged.

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::ProxyError;
use crate::model::{AnalyticsQuery, AnalyticsResponse};

/// Base URL for the analytics API.
pub const EXPA_API_BASE: &str = "https://analytics.api.aiesec.org/v2/applications/analyze.json";

/// Office reported on when none is configured.
pub const DEFAULT_OFFICE_ID: &str = "1552";

/// Client for the analytics histogram endpoint.
#[derive(Clone)]
pub struct ExpaClient {
    client: reqwest::Client,
    base_url: String,
    office_id: String,
    access_token: Option<String>,
}

impl ExpaClient {
    /// Create a client against the production API.
    ///
    /// # Arguments
    ///
    /// * `office_id` - Office whose funnel is reported.
    /// * `access_token` - API token. Without one every fetch fails with
    ///   [`ProxyError::MissingToken`].
    pub fn new(office_id: &str, access_token: Option<String>) -> Self {
        Self::with_base_url(EXPA_API_BASE, office_id, access_token)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str, office_id: &str, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            office_id: office_id.to_string(),
            access_token,
        }
    }

    /// Whether an access token is configured.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn office_id(&self) -> &str {
        &self.office_id
    }

    /// Build the request URL, including the access token.
    fn build_url(&self, query: &AnalyticsQuery, access_token: &str) -> String {
        format!(
            "{}?{}={}&start_date={}&end_date={}&{}={}&access_token={}",
            self.base_url,
            urlencoding::encode("histogram[office_id]"),
            urlencoding::encode(&self.office_id),
            urlencoding::encode(&query.start_date),
            urlencoding::encode(&query.end_date),
            urlencoding::encode("histogram[interval]"),
            query.interval.as_str(),
            urlencoding::encode(access_token),
        )
    }

    /// Fetch the raw JSON body, exactly as upstream sent it.
    pub async fn fetch_raw(&self, query: &AnalyticsQuery) -> Result<serde_json::Value, ProxyError> {
        self.fetch(query).await
    }

    /// Fetch and decode the analytics response.
    pub async fn fetch_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse, ProxyError> {
        self.fetch(query).await
    }

    #[instrument(skip(self), fields(office_id = %self.office_id))]
    async fn fetch<T: DeserializeOwned>(&self, query: &AnalyticsQuery) -> Result<T, ProxyError> {
        let access_token = self.access_token.as_deref().ok_or(ProxyError::MissingToken)?;
        let url = self.build_url(query, access_token);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await?;
            warn!(status = status.as_u16(), "Upstream analytics request failed");
            return Err(ProxyError::Upstream { status, details });
        }

        let body = response.json::<T>().await?;
        debug!(status = status.as_u16(), "Upstream analytics fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Interval;

    #[test]
    fn test_build_url_encodes_params() {
        let client = ExpaClient::with_base_url("http://upstream.test/analyze.json", "1552", None);
        let query = AnalyticsQuery {
            start_date: "2024-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            interval: Interval::Quarter,
        };

        let url = client.build_url(&query, "tok en&x");

        assert_eq!(
            url,
            "http://upstream.test/analyze.json\
             ?histogram%5Boffice_id%5D=1552\
             &start_date=2024-01-01&end_date=2024-12-31\
             &histogram%5Binterval%5D=quarter\
             &access_token=tok%20en%26x"
        );
    }

    #[tokio::test]
    async fn test_missing_token_skips_request() {
        // Unroutable base URL: any outbound attempt would be a transport error
        let client = ExpaClient::with_base_url("http://127.0.0.1:9/analyze.json", "1552", None);

        let err = client
            .fetch_raw(&AnalyticsQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::MissingToken));
        assert!(!client.has_token());
    }

    #[test]
    fn test_default_office() {
        let client = ExpaClient::new(DEFAULT_OFFICE_ID, Some("secret".to_string()));
        assert_eq!(client.office_id(), "1552");
        assert!(client.has_token());
    }
}
