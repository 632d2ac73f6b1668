//! Tool Executor port
//!
//! Defines how the turn loop invokes tools. The registry in the
//! infrastructure layer is the adapter.

use agency_domain::{ToolCall, ToolDefinition, ToolError, ToolResult, ToolSpec};
use async_trait::async_trait;
use std::sync::Arc;

/// Port for tool execution
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// JSON Schema of a registered tool
    fn schema(&self, name: &str) -> Option<serde_json::Value>;

    /// Execute a tool call.
    ///
    /// `Err` means the call could not be resolved at all (unknown tool,
    /// arguments that break the parameter contract). Rate limits, rejected
    /// confirmations and handler failures come back as `Ok` with an
    /// unsuccessful result.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;

    /// An executor with the same tools but independent mutable state
    /// (rate-limit windows, remembered approvals), for a parallel branch.
    fn isolate(&self) -> Arc<dyn ToolExecutorPort>;
}
