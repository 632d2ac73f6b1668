//! Port definitions for the application layer
//!
//! Ports define the interfaces that the application layer needs from
//! external systems. Adapters in the infrastructure layer implement them.

pub mod agent_hooks;
pub mod confirmation;
pub mod model_caller;
pub mod tool_executor;
