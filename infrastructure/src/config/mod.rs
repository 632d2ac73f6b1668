//! Configuration file loading for agency
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENCY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./agency.toml` or `./.agency.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agency/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_MODEL, DEFAULT_REMINDER, FileAgencySettings, FileAgentConfig,
    FileConfig, FileEdgeConfig, FileModelConfig, FileRateLimit, FileToolsConfig,
};
pub use loader::{ConfigLoadError, ConfigLoader};
