//! External data sources.
//!
//! # Data Sources
//!
//! - [`expa`]: the exchange analytics API (funnel totals and date histograms)

pub mod expa;

pub use expa::ExpaClient;
