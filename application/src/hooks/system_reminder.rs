//! Periodic system reminders.

use crate::ports::agent_hooks::{AgentHooks, HookResult};
use crate::ports::model_caller::ModelRequest;
use agency_domain::ToolCall;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Injects a fixed reminder into the next model call after every
/// `interval` completed tool calls.
///
/// The counter spans every agent the hook is installed on. A reminder that
/// is due is delivered once, on the next outgoing model request.
pub struct SystemReminderHook {
    reminder: String,
    interval: usize,
    tool_calls: AtomicUsize,
    pending: AtomicBool,
}

impl SystemReminderHook {
    /// `interval` of zero is treated as one.
    pub fn new(reminder: impl Into<String>, interval: usize) -> Self {
        Self {
            reminder: reminder.into(),
            interval: interval.max(1),
            tool_calls: AtomicUsize::new(0),
            pending: AtomicBool::new(false),
        }
    }

    pub fn tool_calls(&self) -> usize {
        self.tool_calls.load(Ordering::SeqCst)
    }
}

impl AgentHooks for SystemReminderHook {
    fn on_tool_end(&self, _agent: &str, _call: &ToolCall, _output: &str, _success: bool) -> HookResult {
        let count = self.tool_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if count % self.interval == 0 {
            self.pending.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn on_model_call_start(&self, _agent: &str, request: &mut ModelRequest) -> HookResult {
        if self.pending.swap(false, Ordering::SeqCst) {
            request.reminders.push(self.reminder.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_domain::ReasoningEffort;

    fn request() -> ModelRequest {
        ModelRequest {
            agent: "coder".into(),
            model: "test".into(),
            reasoning_effort: ReasoningEffort::Medium,
            system_prompt: String::new(),
            history: Vec::new(),
            tools: Vec::new(),
            reminders: Vec::new(),
        }
    }

    #[test]
    fn test_reminder_after_interval() {
        let hook = SystemReminderHook::new("Stay on task.", 2);
        let call = ToolCall::new("calculator");

        hook.on_tool_end("coder", &call, "4", true).unwrap();
        let mut first = request();
        hook.on_model_call_start("coder", &mut first).unwrap();
        assert!(first.reminders.is_empty());

        hook.on_tool_end("coder", &call, "4", true).unwrap();
        let mut second = request();
        hook.on_model_call_start("coder", &mut second).unwrap();
        assert_eq!(second.reminders, vec!["Stay on task.".to_string()]);

        // Delivered once
        let mut third = request();
        hook.on_model_call_start("coder", &mut third).unwrap();
        assert!(third.reminders.is_empty());
        assert_eq!(hook.tool_calls(), 2);
    }
}
