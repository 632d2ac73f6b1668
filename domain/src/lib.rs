//! Domain layer for agency
//!
//! This crate contains the pure types of the multi-agent orchestration core.
//! It has no dependencies on async runtimes, I/O, or configuration.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A tool is a named capability with a declarative parameter contract. The
//! contract drives both argument validation and the JSON Schema handed to
//! the model collaborator.
//!
//! ## Agents and the Communication Graph
//!
//! Agents are named roles bound to a system prompt and a subset of tools.
//! The communication graph declares which agent may hand off to which, and
//! with which kind of handoff. Anything not declared is refused.

pub mod agent;
pub mod core;
pub mod orchestration;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    entities::{AgentPhase, AgentProfile, ReasoningEffort},
    value_objects::{ModelDecision, Turn, TurnRole},
};
pub use crate::core::error::DomainError;
pub use orchestration::{
    CallStack, CommunicationGraph, Edge, ExecutionMode, HANDOFF_TOOL, HandoffError,
    HandoffKind, HandoffRequest, HandoffResult, default_handoff_kind, handoff_tool_definition,
};
pub use tool::{
    entities::{ParamType, ToolArguments, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    schema::{tool_schema, tool_schemas},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{FAILURE_PREFIX, ToolError, ToolErrorKind, ToolResult},
};
