//! Tool domain value objects - immutable result and error types
//!
//! Every invocation produces either a [`ToolResult`] (the tool was found and
//! its contract satisfied, whatever the handler did) or a [`ToolError`]
//! raised before the handler could run. Both are rendered as plain result
//! strings for the calling agent, so a failing tool never ends its turn.

use serde::{Deserialize, Serialize};

/// Prefix that marks a failed tool result in an agent's history
pub const FAILURE_PREFIX: &str = "Error: ";

/// Category of a tool failure.
///
/// | Kind | Raised when |
/// |------|-------------|
/// | `NotFound` | No tool registered under the requested name |
/// | `InvalidArgument` | Missing, unknown or uncoercible argument |
/// | `DangerousRejected` | Confirmation check declined a dangerous call |
/// | `RateLimited` | Call budget for the window is spent |
/// | `NotPermitted` | Tool exists but is not bound to the calling agent |
/// | `ExecutionFailed` | The handler returned an error or panicked |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    NotFound,
    InvalidArgument,
    DangerousRejected,
    RateLimited,
    NotPermitted,
    ExecutionFailed,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorKind::DangerousRejected => "DANGEROUS_REJECTED",
            ToolErrorKind::RateLimited => "RATE_LIMITED",
            ToolErrorKind::NotPermitted => "NOT_PERMITTED",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error that occurred while resolving or running a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("[{kind}] {message}")]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(tool_name: &str) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("Tool not found: {}", tool_name),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArgument, message)
    }

    pub fn dangerous_rejected(tool_name: &str, reason: &str) -> Self {
        Self::new(
            ToolErrorKind::DangerousRejected,
            format!("Dangerous tool '{}' was not confirmed: {}", tool_name, reason),
        )
    }

    pub fn rate_limited(tool_name: &str, max_calls: usize, window_secs: f64) -> Self {
        Self::new(
            ToolErrorKind::RateLimited,
            format!(
                "Rate limit exceeded for '{}': at most {} calls per {}s. Try again later.",
                tool_name, max_calls, window_secs
            ),
        )
    }

    pub fn not_permitted(tool_name: &str, agent: &str) -> Self {
        Self::new(
            ToolErrorKind::NotPermitted,
            format!("Tool '{}' is not available to agent '{}'", tool_name, agent),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailed, message)
    }

    /// Render as the result string handed back to the calling agent
    pub fn to_message(&self) -> String {
        format!("{}{}", FAILURE_PREFIX, self.message)
    }
}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Wall time of the handler in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Render as the result string appended to the agent's history.
    ///
    /// Failures carry [`FAILURE_PREFIX`] so the model can tell them apart.
    pub fn to_message(&self) -> String {
        match (&self.error, &self.output) {
            (Some(error), _) => error.to_message(),
            (None, Some(output)) => output.clone(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::not_found("missing_tool");
        assert_eq!(err.kind, ToolErrorKind::NotFound);
        assert_eq!(err.to_string(), "[NOT_FOUND] Tool not found: missing_tool");
        assert_eq!(err.to_message(), "Error: Tool not found: missing_tool");
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("calculator", "4").with_duration(3);

        assert!(result.is_success());
        assert_eq!(result.output(), Some("4"));
        assert!(result.error().is_none());
        assert_eq!(result.duration_ms, Some(3));
        assert_eq!(result.to_message(), "4");
    }

    #[test]
    fn test_tool_result_failure_is_prefixed() {
        let result = ToolResult::failure(
            "write_file",
            ToolError::dangerous_rejected("write_file", "no confirmation"),
        );

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(
            result.error().unwrap().kind,
            ToolErrorKind::DangerousRejected
        );
        assert!(result.to_message().starts_with(FAILURE_PREFIX));
    }

    #[test]
    fn test_kind_wire_name() {
        let json = serde_json::to_value(ToolErrorKind::RateLimited).unwrap();
        assert_eq!(json, "RATE_LIMITED");
    }
}
