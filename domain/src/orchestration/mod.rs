//! Orchestration domain module
//!
//! Static structure of an agency and the value types of its handoff
//! protocol:
//!
//! - [`CommunicationGraph`] / [`Edge`] / [`HandoffKind`] - who may delegate to whom
//! - [`CallStack`] - nested handoff frames of one execution
//! - [`HandoffRequest`] / [`HandoffResult`] / [`HandoffError`] - one delegation
//! - [`ExecutionMode`] - sequential or parallel execution of simultaneous handoffs

pub mod call_stack;
pub mod graph;
pub mod handoff;
pub mod mode;

pub use call_stack::CallStack;
pub use graph::{CommunicationGraph, Edge, HandoffKind};
pub use handoff::{
    HANDOFF_TOOL, HandoffError, HandoffRequest, HandoffResult, default_handoff_kind,
    handoff_tool_definition,
};
pub use mode::ExecutionMode;
