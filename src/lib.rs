//! Funnelview - exchange funnel analytics over an upstream histogram API.
//!
//! # Overview
//!
//! Funnelview fetches funnel metrics (sign-ups, applications, matches,
//! approvals, realizations, completions) for one office from a remote
//! analytics API and turns the bucketed counts into chart-ready series,
//! trend summaries, KPI insights and funnel stage totals.
//!
//! The transform core is pure: no state is kept between requests and
//! identical input always yields identical output.
//!
//! # Modules
//!
//! - [`model`]: Upstream wire types and derived chart/KPI types
//! - [`aggregation`]: Series merge, trend analysis, funnel and rate views
//! - [`insights`]: KPI insight derivation
//! - [`data_sources`]: Upstream analytics API client
//! - [`dashboard`]: Fetch + compute orchestration with demo fallback
//! - [`demo`]: Built-in demonstration dataset
//! - [`config`]: Environment configuration
//! - [`error`]: Error types and their HTTP mapping
//! - [`api`]: HTTP API handlers

pub mod aggregation;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod data_sources;
pub mod demo;
pub mod error;
pub mod insights;
pub mod model;
