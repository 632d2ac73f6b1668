//! Tool implementations for the infrastructure layer
//!
//! - [`ToolRegistry`] - name-keyed tool collection implementing `ToolExecutorPort`
//! - [`RateLimiter`] - per-tool sliding-window limits
//! - [`builtin`] - `calculator`, `get_time`
//! - [`file`] - `read_file`, `write_file`, `edit_file`

pub mod builtin;
pub mod file;
pub mod rate_limit;
pub mod registry;

pub use builtin::builtin_tools;
pub use file::{WRITE_LOCK, file_tools};
pub use rate_limit::{RateLimit, RateLimiter};
pub use registry::{RegistryStats, Tool, ToolHandler, ToolRegistry};

/// Registry with every built-in and file tool registered
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in builtin_tools().into_iter().chain(file_tools()) {
        // Built-in names are distinct
        if let Err(e) = registry.register(tool) {
            tracing::warn!(error = %e, "Skipping built-in tool");
        }
    }
    registry
}
