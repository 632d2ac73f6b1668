//! Domain error types

use thiserror::Error;

/// Setup-time errors.
///
/// Raised synchronously while a registry or an agency is being assembled.
/// Failures during a run are reported as result strings instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Agent '{0}' is already part of the agency")]
    DuplicateAgent(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },

    #[error("No entry agent configured")]
    NoEntryAgent,

    #[error("Agent '{agent}' references unknown tool '{tool}'")]
    UnknownTool { agent: String, tool: String },
}

impl DomainError {
    /// Check if this error was caused by a name collision
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateTool(_) | DomainError::DuplicateAgent(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_tool_display() {
        let error = DomainError::DuplicateTool("calculator".to_string());
        assert_eq!(error.to_string(), "Tool 'calculator' is already registered");
        assert!(error.is_duplicate());
    }

    #[test]
    fn test_invalid_edge_display() {
        let error = DomainError::InvalidEdge {
            from: "planner".to_string(),
            to: "planner".to_string(),
            reason: "self edges are not allowed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid edge planner -> planner: self edges are not allowed"
        );
        assert!(!error.is_duplicate());
        assert!(!DomainError::NoEntryAgent.is_duplicate());
    }
}
