//! Application layer for agency
//!
//! This crate contains the agent turn loop, the handoff protocol, hooks and
//! the port definitions. It depends only on the domain layer.

pub mod config;
pub mod hooks;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AgencyConfig;
pub use hooks::{CompositeHooks, SystemReminderHook, TracingHooks};
pub use ports::{
    agent_hooks::{AgentHooks, HookError, HookResult, NoHooks},
    confirmation::{
        AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationDecision, ConfirmationPort,
    },
    model_caller::{ModelCallError, ModelCaller, ModelRequest},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::agency::{
    Agency, AgencyBuilder, Agent, AgentOutput, AgentRunError, ExecutionContext,
    create_coder_agent, create_planner_agent, create_reviewer_agent,
};
