//! Type definitions for the agency use case.

use crate::ports::model_caller::ModelCallError;
use agency_domain::HandoffError;
use thiserror::Error;

/// Errors that end one agent run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentRunError {
    #[error("Turn limit of {max_turns} model calls exceeded")]
    TurnLimitExceeded { max_turns: usize, partial: String },

    #[error("Model call timed out after {attempts} attempt(s)")]
    ModelCallTimeout { attempts: usize },

    #[error("Model call failed: {0}")]
    ModelCall(#[from] ModelCallError),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl AgentRunError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AgentRunError::Cancelled)
    }

    /// Best answer the agent produced before failing, if any
    pub fn partial_response(&self) -> Option<&str> {
        match self {
            AgentRunError::TurnLimitExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// How this failure is reported to the agent that handed off
    pub fn to_handoff_error(&self) -> HandoffError {
        match self {
            AgentRunError::Cancelled => HandoffError::Cancelled,
            AgentRunError::UnknownAgent(name) => HandoffError::UnknownAgent(name.clone()),
            other => HandoffError::AgentFailed(other.to_string()),
        }
    }
}

/// Result of one completed agent run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    pub agent: String,
    pub response: String,
    /// Model calls made
    pub turns: usize,
    /// Tool and handoff calls executed
    pub tool_calls: usize,
}
