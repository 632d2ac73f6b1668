//! Composite hooks: fan one event out to several hook sets.

use crate::ports::agent_hooks::{AgentHooks, HookError, HookResult};
use crate::ports::model_caller::ModelRequest;
use agency_domain::{HandoffRequest, ModelDecision, ToolCall};
use std::sync::Arc;

/// Delegates every event to each inner hook set in order.
///
/// Every delegate sees the event even when an earlier one fails; the
/// failures are joined into a single [`HookError`].
#[derive(Default, Clone)]
pub struct CompositeHooks {
    delegates: Vec<Arc<dyn AgentHooks>>,
}

impl CompositeHooks {
    pub fn new(delegates: Vec<Arc<dyn AgentHooks>>) -> Self {
        Self { delegates }
    }

    pub fn push(mut self, hooks: Arc<dyn AgentHooks>) -> Self {
        self.delegates.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    fn each<F>(&self, mut f: F) -> HookResult
    where
        F: FnMut(&dyn AgentHooks) -> HookResult,
    {
        let errors: Vec<String> = self
            .delegates
            .iter()
            .filter_map(|d| f(d.as_ref()).err())
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(HookError::new(errors.join("; ")))
        }
    }
}

impl AgentHooks for CompositeHooks {
    fn on_start(&self, agent: &str, input: &str) -> HookResult {
        self.each(|d| d.on_start(agent, input))
    }

    fn on_end(&self, agent: &str, output: &str) -> HookResult {
        self.each(|d| d.on_end(agent, output))
    }

    fn on_tool_start(&self, agent: &str, call: &ToolCall) -> HookResult {
        self.each(|d| d.on_tool_start(agent, call))
    }

    fn on_tool_end(&self, agent: &str, call: &ToolCall, output: &str, success: bool) -> HookResult {
        self.each(|d| d.on_tool_end(agent, call, output, success))
    }

    fn on_model_call_start(&self, agent: &str, request: &mut ModelRequest) -> HookResult {
        self.each(|d| d.on_model_call_start(agent, request))
    }

    fn on_model_call_end(&self, agent: &str, decision: &ModelDecision) -> HookResult {
        self.each(|d| d.on_model_call_end(agent, decision))
    }

    fn on_handoff(&self, from: &str, to: &str, request: &HandoffRequest) -> HookResult {
        self.each(|d| d.on_handoff(from, to, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl AgentHooks for Counting {
        fn on_start(&self, _agent: &str, _input: &str) -> HookResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Refusing;

    impl AgentHooks for Refusing {
        fn on_start(&self, _agent: &str, _input: &str) -> HookResult {
            Err(HookError::new("refused"))
        }
    }

    #[test]
    fn test_all_delegates_see_event_despite_failure() {
        let counter = Arc::new(Counting::default());
        let composite = CompositeHooks::new(vec![
            Arc::new(Refusing),
            counter.clone(),
            Arc::new(Refusing),
        ]);

        let err = composite.on_start("planner", "hi").unwrap_err();
        assert_eq!(err.to_string(), "refused; refused");
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(composite.len(), 3);
    }
}
