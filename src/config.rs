//! Environment-driven configuration.

use std::env;
use std::fmt;

use crate::data_sources::expa::{DEFAULT_OFFICE_ID, EXPA_API_BASE};

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration, read once at start-up.
#[derive(Clone)]
pub struct Config {
    /// Listen port (`FUNNELVIEW_PORT`).
    pub port: u16,

    /// Upstream API token (`EXPA_ACCESS_TOKEN`). Never logged.
    pub access_token: Option<String>,

    /// Office reported on (`EXPA_OFFICE_ID`).
    pub office_id: String,

    /// Upstream endpoint (`EXPA_API_URL`).
    pub api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            access_token: None,
            office_id: DEFAULT_OFFICE_ID.to_string(),
            api_url: EXPA_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            port: var("FUNNELVIEW_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            access_token: var("EXPA_ACCESS_TOKEN"),
            office_id: var("EXPA_OFFICE_ID").unwrap_or(defaults.office_id),
            api_url: var("EXPA_API_URL").unwrap_or(defaults.api_url),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("office_id", &self.office_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}
