//! Application-level configuration.
//!
//! - [`AgencyConfig`] - turn loop and handoff control (timeouts, limits, mode)

pub mod agency_config;

pub use agency_config::AgencyConfig;
