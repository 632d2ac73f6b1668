//! Confirmation port for dangerous tools.
//!
//! Every invocation of a tool flagged dangerous must be approved before its
//! handler runs. The interactive console prompt lives in the CLI crate.
//!
//! # Built-in Implementations
//!
//! - [`AutoApproveConfirmation`] - approves everything (`--yes`)
//! - [`AutoRejectConfirmation`] - rejects everything (non-interactive default)

use agency_domain::{ToolCall, ToolDefinition};

/// Answer to a confirmation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationDecision {
    /// Run this invocation
    Approve,
    /// Run this invocation and stop asking for this tool
    ApproveAlways,
    /// Refuse, with a reason reported back to the model
    Reject(String),
}

impl ConfirmationDecision {
    pub fn is_approved(&self) -> bool {
        !matches!(self, ConfirmationDecision::Reject(_))
    }
}

/// Port for confirming dangerous tool invocations
///
/// Called off the async runtime, so implementations may block on user input.
pub trait ConfirmationPort: Send + Sync {
    fn confirm(&self, definition: &ToolDefinition, call: &ToolCall) -> ConfirmationDecision;
}

/// Approves every invocation
pub struct AutoApproveConfirmation;

impl ConfirmationPort for AutoApproveConfirmation {
    fn confirm(&self, _definition: &ToolDefinition, _call: &ToolCall) -> ConfirmationDecision {
        ConfirmationDecision::Approve
    }
}

/// Rejects every invocation
pub struct AutoRejectConfirmation;

impl ConfirmationPort for AutoRejectConfirmation {
    fn confirm(&self, definition: &ToolDefinition, _call: &ToolCall) -> ConfirmationDecision {
        ConfirmationDecision::Reject(format!(
            "'{}' needs confirmation and no one is there to give it",
            definition.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_implementations() {
        let def = ToolDefinition::new("write_file", "Write").dangerous();
        let call = ToolCall::new("write_file");

        assert!(AutoApproveConfirmation.confirm(&def, &call).is_approved());
        match AutoRejectConfirmation.confirm(&def, &call) {
            ConfirmationDecision::Reject(reason) => assert!(reason.contains("write_file")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
