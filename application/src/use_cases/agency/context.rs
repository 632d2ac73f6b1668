//! Execution context of one agent run.

use crate::ports::model_caller::ModelCaller;
use crate::ports::tool_executor::ToolExecutorPort;
use agency_domain::{CallStack, Turn};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// State owned by the task running one agent's turns.
///
/// Never shared mutably: a sequential handoff moves the call stack into a
/// nested context and takes it back afterwards, a parallel branch gets its
/// own copy of everything.
pub struct ExecutionContext {
    registry: Arc<dyn ToolExecutorPort>,
    model_caller: Arc<dyn ModelCaller>,
    history: Vec<Turn>,
    call_stack: CallStack,
    context_data: Map<String, Value>,
    cancellation: CancellationToken,
}

impl ExecutionContext {
    pub fn new(registry: Arc<dyn ToolExecutorPort>, model_caller: Arc<dyn ModelCaller>) -> Self {
        Self {
            registry,
            model_caller,
            history: Vec::new(),
            call_stack: CallStack::new(),
            context_data: Map::new(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_context_data(mut self, data: Map<String, Value>) -> Self {
        self.context_data = data;
        self
    }

    pub fn registry(&self) -> &Arc<dyn ToolExecutorPort> {
        &self.registry
    }

    pub fn model_caller(&self) -> &Arc<dyn ModelCaller> {
        &self.model_caller
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    pub fn context_data(&self) -> &Map<String, Value> {
        &self.context_data
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub(super) fn push_turn(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    pub(super) fn call_stack_mut(&mut self) -> &mut CallStack {
        &mut self.call_stack
    }

    /// Context data of this run overlaid with a handoff's own data
    fn merged_context(&self, extra: Option<&Map<String, Value>>) -> Map<String, Value> {
        let mut merged = self.context_data.clone();
        if let Some(extra) = extra {
            merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    /// Context for a handoff executed inline. Takes the call stack; hand
    /// the nested context back to [`Self::rejoin`] when the handoff returns.
    pub(super) fn nested(&mut self, extra: Option<&Map<String, Value>>) -> ExecutionContext {
        ExecutionContext {
            registry: Arc::clone(&self.registry),
            model_caller: Arc::clone(&self.model_caller),
            history: Vec::new(),
            context_data: self.merged_context(extra),
            call_stack: std::mem::take(&mut self.call_stack),
            cancellation: self.cancellation.clone(),
        }
    }

    pub(super) fn rejoin(&mut self, nested: ExecutionContext) {
        self.call_stack = nested.call_stack;
    }

    /// Fully isolated context for a parallel branch
    pub(super) fn branch(
        &self,
        extra: Option<&Map<String, Value>>,
        cancellation: CancellationToken,
    ) -> ExecutionContext {
        ExecutionContext {
            registry: self.registry.isolate(),
            model_caller: Arc::clone(&self.model_caller),
            history: Vec::new(),
            context_data: self.merged_context(extra),
            call_stack: self.call_stack.clone(),
            cancellation,
        }
    }

    /// System turn carrying the context data, for a run starting from scratch
    pub(super) fn context_turn(&self) -> Option<Turn> {
        if self.context_data.is_empty() {
            return None;
        }
        let rendered = serde_json::to_string_pretty(&self.context_data)
            .unwrap_or_else(|_| Value::Object(self.context_data.clone()).to_string());
        Some(Turn::system(format!("Context data:\n{}", rendered)))
    }
}
