//! Agent hooks port
//!
//! Lifecycle callbacks fired by the turn loop. All methods default to a
//! no-op so implementations only override the events they care about.
//!
//! A hook that returns `Err` or panics is logged and ignored; it never
//! changes the outcome of the turn. The only mutation a hook may perform is
//! on the outgoing [`ModelRequest`] in [`AgentHooks::on_model_call_start`].

use crate::ports::model_caller::ModelRequest;
use agency_domain::{HandoffRequest, ModelDecision, ToolCall};
use thiserror::Error;

/// Failure reported by a hook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type HookResult = Result<(), HookError>;

/// Lifecycle callbacks for agent execution
pub trait AgentHooks: Send + Sync {
    /// The agent received its input and is about to call the model
    fn on_start(&self, _agent: &str, _input: &str) -> HookResult {
        Ok(())
    }

    /// The agent produced its final (or partial) answer
    fn on_end(&self, _agent: &str, _output: &str) -> HookResult {
        Ok(())
    }

    fn on_tool_start(&self, _agent: &str, _call: &ToolCall) -> HookResult {
        Ok(())
    }

    /// `output` is the string merged into history, failures included
    fn on_tool_end(&self, _agent: &str, _call: &ToolCall, _output: &str, _success: bool) -> HookResult {
        Ok(())
    }

    fn on_model_call_start(&self, _agent: &str, _request: &mut ModelRequest) -> HookResult {
        Ok(())
    }

    fn on_model_call_end(&self, _agent: &str, _decision: &ModelDecision) -> HookResult {
        Ok(())
    }

    /// Fired on the agency hooks and on the receiving agent's hooks
    fn on_handoff(&self, _from: &str, _to: &str, _request: &HandoffRequest) -> HookResult {
        Ok(())
    }
}

/// No-op hooks
pub struct NoHooks;

impl AgentHooks for NoHooks {}
