//! Tool domain module
//!
//! Defines how capabilities are described to agents and to the model
//! collaborator. A tool is a [`ToolDefinition`] (name, ordered parameter
//! contract, dangerous flag); a [`ToolCall`] names a tool with arguments; the
//! outcome is a [`ToolResult`] or a [`ToolError`].
//!
//! ```text
//! ┌────────────────┐  validate   ┌──────────────┐  handler   ┌──────────────┐
//! │ ToolDefinition │◀────────────│ ToolCall     │───────────▶│ ToolResult   │
//! └───────┬────────┘             └──────────────┘            └──────────────┘
//!         │ tool_schema()
//!         ▼
//!   JSON Schema (wire contract for the model collaborator)
//! ```
//!
//! Everything here is pure. Handlers, rate limits and confirmation state
//! live in the infrastructure registry behind `ToolExecutorPort`.

pub mod entities;
pub mod schema;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolArguments, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use schema::{tool_schema, tool_schemas};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{FAILURE_PREFIX, ToolError, ToolErrorKind, ToolResult};
