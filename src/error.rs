//! Error types for Funnelview.
//!
//! Only two things can actually go wrong:
//!
//! - [`AnalyticsError`]: the upstream broke its data contract (a bucket date
//!   that cannot be parsed). Missing metrics and zero denominators are not
//!   errors anywhere in this crate.
//! - [`ProxyError`]: the outbound call to the analytics API could not be made
//!   or did not succeed. It renders as the `{error, details}` JSON payload.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the transform core.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A bucket carried a date string that is not an ISO date or timestamp.
    #[error("invalid bucket date: {date:?}")]
    InvalidDate { date: String },
}

/// Errors raised while fetching from the upstream analytics API.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No access token is configured on the server.
    #[error("Access token not configured. Please set EXPA_ACCESS_TOKEN in .env file.")]
    MissingToken,

    /// Upstream answered with a non-success status.
    #[error("API Error: {}", .status.as_u16())]
    Upstream { status: StatusCode, details: String },

    /// Network failure, or a body that is not the expected JSON.
    #[error("Failed to fetch analytics data")]
    Transport(reqwest::Error),
}

/// The outbound URL carries the access token, so it is stripped here before
/// the error can reach a response body or a log line.
impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Transport(err.without_url())
    }
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        let body = json!({ "error": "Invalid analytics data", "details": self.to_string() });
        (StatusCode::BAD_GATEWAY, Json(body)).into_response()
    }
}

impl ProxyError {
    /// HTTP status relayed to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingToken | ProxyError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream { status, .. } => *status,
        }
    }

    /// Detail string for the error payload, if the variant has one.
    pub fn details(&self) -> Option<String> {
        match self {
            ProxyError::MissingToken => None,
            ProxyError::Upstream { details, .. } => Some(details.clone()),
            ProxyError::Transport(e) => Some(e.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
