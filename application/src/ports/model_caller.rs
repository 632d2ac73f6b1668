//! Model caller port
//!
//! The language model is an external collaborator. The turn loop hands it a
//! [`ModelRequest`] and receives a [`ModelDecision`]: either a final answer
//! or a list of tool calls to run before the next model call.

use agency_domain::{ModelDecision, ReasoningEffort, Turn};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when calling the model collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelCallError {
    #[error("Model call timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Model call rejected: {0}")]
    Rejected(String),
}

impl ModelCallError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelCallError::Timeout | ModelCallError::Transport(_))
    }
}

/// Everything the model needs to decide an agent's next step
#[derive(Debug, Clone, Serialize)]
pub struct ModelRequest {
    pub agent: String,
    pub model: String,
    pub reasoning_effort: ReasoningEffort,
    pub system_prompt: String,
    pub history: Vec<Turn>,
    /// JSON Schemas of the tools offered for this call
    pub tools: Vec<serde_json::Value>,
    /// Out-of-band reminders injected by hooks for this call only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reminders: Vec<String>,
}

impl ModelRequest {
    pub fn offers_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t["name"] == name)
    }
}

/// Port for the model collaborator.
///
/// Implementations live in the infrastructure layer (scripted replay,
/// external process). Tests use in-memory fakes.
#[async_trait]
pub trait ModelCaller: Send + Sync {
    async fn call(&self, request: &ModelRequest) -> Result<ModelDecision, ModelCallError>;
}
