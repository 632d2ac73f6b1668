//! Infrastructure layer for agency
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the tool registry and its built-in tools, model
//! callers, and configuration file loading.

pub mod assembly;
pub mod config;
pub mod model;
pub mod tools;

// Re-export commonly used types
pub use assembly::{AssemblyError, build_agency, build_model_caller, build_registry};
pub use config::{ConfigLoadError, ConfigLoader, ConfigValidationError, FileConfig};
pub use model::{ProcessModelCaller, ScriptLoadError, ScriptedModelCaller};
pub use tools::{RateLimit, RateLimiter, Tool, ToolHandler, ToolRegistry, default_registry};
