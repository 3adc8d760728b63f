//! Indicative public-sector bid readiness scoring.
//!
//! The [`scoring`] module holds the pure engine; [`scoring::router`] exposes it over HTTP.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
