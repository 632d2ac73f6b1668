//! Hooks that turn lifecycle events into `tracing` events.

use crate::ports::agent_hooks::{AgentHooks, HookResult};
use crate::ports::model_caller::ModelRequest;
use agency_domain::core::string::preview;
use agency_domain::{HandoffRequest, ModelDecision, ToolCall};
use tracing::{debug, info};

const PREVIEW_CHARS: usize = 120;

/// Logs every lifecycle event. Installed by the CLI at `-v` and above.
pub struct TracingHooks;

impl AgentHooks for TracingHooks {
    fn on_start(&self, agent: &str, input: &str) -> HookResult {
        info!(agent, input = %preview(input, PREVIEW_CHARS), "agent start");
        Ok(())
    }

    fn on_end(&self, agent: &str, output: &str) -> HookResult {
        info!(agent, output = %preview(output, PREVIEW_CHARS), "agent end");
        Ok(())
    }

    fn on_tool_start(&self, agent: &str, call: &ToolCall) -> HookResult {
        debug!(agent, tool = %call.tool_name, "tool start");
        Ok(())
    }

    fn on_tool_end(&self, agent: &str, call: &ToolCall, output: &str, success: bool) -> HookResult {
        debug!(
            agent,
            tool = %call.tool_name,
            success,
            output = %preview(output, PREVIEW_CHARS),
            "tool end"
        );
        Ok(())
    }

    fn on_model_call_start(&self, agent: &str, request: &mut ModelRequest) -> HookResult {
        debug!(
            agent,
            model = %request.model,
            history = request.history.len(),
            tools = request.tools.len(),
            "model call"
        );
        Ok(())
    }

    fn on_model_call_end(&self, agent: &str, decision: &ModelDecision) -> HookResult {
        debug!(
            agent,
            is_final = decision.is_final(),
            calls = decision.calls().len(),
            "model decision"
        );
        Ok(())
    }

    fn on_handoff(&self, from: &str, to: &str, request: &HandoffRequest) -> HookResult {
        info!(from, to, kind = %request.kind, "handoff");
        Ok(())
    }
}
