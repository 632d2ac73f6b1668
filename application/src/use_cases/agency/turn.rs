//! The agent turn loop.

use super::agent::Agent;
use super::context::ExecutionContext;
use super::types::{AgentOutput, AgentRunError};
use super::Agency;
use crate::ports::model_caller::{ModelCallError, ModelRequest};
use agency_domain::{
    AgentPhase, FAILURE_PREFIX, HANDOFF_TOOL, HandoffRequest, ModelDecision, ToolCall, ToolError, Turn,
    default_handoff_kind, handoff_tool_definition, tool_schema,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-run bookkeeping of the turn loop
struct TurnState {
    phase: AgentPhase,
    turns: usize,
    tool_calls: usize,
    /// Last assistant text, kept as the partial answer
    last_text: String,
}

impl TurnState {
    fn new() -> Self {
        Self {
            phase: AgentPhase::AwaitingInput,
            turns: 0,
            tool_calls: 0,
            last_text: String::new(),
        }
    }

    fn advance(&mut self, agent: &str, next: AgentPhase) {
        if !self.phase.can_transition_to(next) {
            warn!(agent, from = %self.phase, to = %next, "Unexpected phase transition");
        }
        self.phase = next;
    }
}

impl Agency {
    /// Run `agent` until it produces a final answer or a limit stops it.
    ///
    /// Boxed because handoffs recurse into it.
    pub(super) fn run_agent<'a>(
        &'a self,
        agent: &'a Agent,
        ctx: &'a mut ExecutionContext,
        input: &'a str,
    ) -> BoxFuture<'a, Result<AgentOutput, AgentRunError>> {
        async move {
            let name = agent.name();
            let max_turns = agent.max_turns().unwrap_or(self.config().max_turns);
            let started = Instant::now();

            info!(agent = name, depth = ctx.call_stack().depth(), "Agent run started");
            self.fire(agent, "on_start", |h| h.on_start(name, input));

            if ctx.history().is_empty()
                && let Some(turn) = ctx.context_turn()
            {
                ctx.push_turn(turn);
            }
            ctx.push_turn(Turn::user(input));

            let tools = self.tool_schemas_for(agent, ctx);
            let mut state = TurnState::new();

            while state.turns < max_turns {
                if ctx.is_cancelled() {
                    return Err(AgentRunError::Cancelled);
                }

                state.advance(name, AgentPhase::ModelCall);
                state.turns += 1;

                let mut request = ModelRequest {
                    agent: name.to_string(),
                    model: agent.profile().model.clone(),
                    reasoning_effort: agent.profile().reasoning_effort,
                    system_prompt: agent.profile().system_prompt.clone(),
                    history: ctx.history().to_vec(),
                    tools: tools.clone(),
                    reminders: Vec::new(),
                };
                self.fire(agent, "on_model_call_start", |h| {
                    h.on_model_call_start(name, &mut request)
                });

                let decision = self.call_model(&request, ctx).await?;
                self.fire(agent, "on_model_call_end", |h| h.on_model_call_end(name, &decision));

                match decision {
                    ModelDecision::FinalAnswer { content } => {
                        return Ok(self.finish(agent, ctx, &mut state, content, started));
                    }
                    ModelDecision::ToolCalls { content, calls } if calls.is_empty() => {
                        // Nothing to run: the text is the answer
                        return Ok(self.finish(agent, ctx, &mut state, content, started));
                    }
                    ModelDecision::ToolCalls { content, calls } => {
                        state.advance(name, AgentPhase::ToolCalls);
                        if !content.trim().is_empty() {
                            state.last_text = content.clone();
                            ctx.push_turn(Turn::assistant(content));
                        }
                        state.tool_calls += calls.len();
                        self.execute_calls(agent, ctx, &calls).await?;
                    }
                }
            }

            let notice = format!("[Stopped after reaching the limit of {} model turns]", max_turns);
            let partial = if state.last_text.is_empty() {
                notice
            } else {
                format!("{}\n\n{}", state.last_text, notice)
            };
            warn!(agent = name, max_turns, "Turn limit exceeded");
            self.fire(agent, "on_end", |h| h.on_end(name, &partial));
            Err(AgentRunError::TurnLimitExceeded { max_turns, partial })
        }
        .boxed()
    }

    fn finish(
        &self,
        agent: &Agent,
        ctx: &mut ExecutionContext,
        state: &mut TurnState,
        content: String,
        started: Instant,
    ) -> AgentOutput {
        let name = agent.name();
        state.advance(name, AgentPhase::FinalAnswer);
        ctx.push_turn(Turn::assistant(content.clone()));
        self.fire(agent, "on_end", |h| h.on_end(name, &content));
        info!(
            agent = name,
            turns = state.turns,
            tool_calls = state.tool_calls,
            duration_ms = started.elapsed().as_millis() as u64,
            "Agent run finished"
        );
        AgentOutput {
            agent: name.to_string(),
            response: content,
            turns: state.turns,
            tool_calls: state.tool_calls,
        }
    }

    /// Schemas of the agent's bound tools, plus `handoff` when it has
    /// outgoing edges.
    fn tool_schemas_for(&self, agent: &Agent, ctx: &ExecutionContext) -> Vec<serde_json::Value> {
        let mut schemas: Vec<serde_json::Value> = agent
            .profile()
            .tools
            .iter()
            .filter_map(|name| ctx.registry().schema(name))
            .collect();

        let targets = self.graph().targets(agent.name());
        if !targets.is_empty() {
            let kinds = self.graph().kinds_from(agent.name());
            schemas.push(tool_schema(&handoff_tool_definition(&targets, &kinds)));
        }
        schemas
    }

    /// Call the model with per-attempt timeout and retries for transient
    /// failures.
    async fn call_model(
        &self,
        request: &ModelRequest,
        ctx: &ExecutionContext,
    ) -> Result<ModelDecision, AgentRunError> {
        let config = self.config();
        let caller = ctx.model_caller();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = tokio::time::timeout(config.model_call_timeout, caller.call(request))
                .await
                .unwrap_or(Err(ModelCallError::Timeout));

            match outcome {
                Ok(decision) => return Ok(decision),
                Err(error) if error.is_transient() && attempt <= config.max_retries => {
                    let delay = config.backoff_delay(attempt);
                    warn!(
                        agent = %request.agent,
                        attempt,
                        max_retries = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Model call failed, retrying"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = ctx.cancellation().cancelled() => return Err(AgentRunError::Cancelled),
                    }
                }
                Err(ModelCallError::Timeout) => {
                    return Err(AgentRunError::ModelCallTimeout { attempts: attempt });
                }
                Err(error) => return Err(AgentRunError::ModelCall(error)),
            }
        }
    }

    /// Execute one batch of tool calls and append their results to history
    /// in the order the model requested them.
    async fn execute_calls(
        &self,
        agent: &Agent,
        ctx: &mut ExecutionContext,
        calls: &[ToolCall],
    ) -> Result<(), AgentRunError> {
        if ctx.is_cancelled() {
            return Err(AgentRunError::Cancelled);
        }

        let mut outputs: Vec<Option<String>> = vec![None; calls.len()];
        let mut handoffs: Vec<(usize, HandoffRequest)> = Vec::new();

        let default_kind = default_handoff_kind(&self.graph().kinds_from(agent.name()));

        for (index, call) in calls.iter().enumerate() {
            if call.tool_name != HANDOFF_TOOL {
                // An abandoned branch must not start further side effects
                if ctx.is_cancelled() {
                    return Err(AgentRunError::Cancelled);
                }
                outputs[index] = Some(self.execute_tool(agent, ctx, call).await);
                continue;
            }
            match HandoffRequest::from_call(call, default_kind) {
                Ok(request) => handoffs.push((index, request)),
                Err(e) => {
                    let message = format!("{}{}", FAILURE_PREFIX, e);
                    self.fire(agent, "on_tool_start", |h| h.on_tool_start(agent.name(), call));
                    self.fire(agent, "on_tool_end", |h| {
                        h.on_tool_end(agent.name(), call, &message, false)
                    });
                    outputs[index] = Some(message);
                }
            }
        }

        if !handoffs.is_empty() {
            if ctx.is_cancelled() {
                return Err(AgentRunError::Cancelled);
            }
            for (index, message) in self.execute_handoffs(agent, ctx, calls, handoffs).await? {
                outputs[index] = Some(message);
            }
        }

        for (call, output) in calls.iter().zip(outputs) {
            ctx.push_turn(Turn::tool(call, output.unwrap_or_default()));
        }
        Ok(())
    }

    async fn execute_tool(&self, agent: &Agent, ctx: &ExecutionContext, call: &ToolCall) -> String {
        let name = agent.name();
        self.fire(agent, "on_tool_start", |h| h.on_tool_start(name, call));

        let outcome = if agent.profile().can_use(&call.tool_name) {
            ctx.registry().execute(call).await
        } else if ctx.registry().has_tool(&call.tool_name) {
            Err(ToolError::not_permitted(&call.tool_name, name))
        } else {
            Err(ToolError::not_found(&call.tool_name))
        };

        let (message, success) = match outcome {
            Ok(result) => (result.to_message(), result.is_success()),
            Err(error) => (error.to_message(), false),
        };
        debug!(agent = name, tool = %call.tool_name, success, "Tool executed");

        self.fire(agent, "on_tool_end", |h| h.on_tool_end(name, call, &message, success));
        message
    }

    /// Run the handoff calls of one batch, sequentially or as parallel
    /// branches, returning `(call index, result string)` pairs.
    async fn execute_handoffs(
        &self,
        agent: &Agent,
        ctx: &mut ExecutionContext,
        calls: &[ToolCall],
        handoffs: Vec<(usize, HandoffRequest)>,
    ) -> Result<Vec<(usize, String)>, AgentRunError> {
        let name = agent.name();
        for (index, _) in &handoffs {
            self.fire(agent, "on_tool_start", |h| h.on_tool_start(name, &calls[*index]));
        }

        let (indices, requests): (Vec<usize>, Vec<HandoffRequest>) = handoffs.into_iter().unzip();
        let results = if self.config().mode.is_parallel() && requests.len() > 1 {
            self.handoff_parallel(ctx, name, requests).await
        } else {
            let mut results = Vec::with_capacity(requests.len());
            for request in requests {
                if ctx.is_cancelled() {
                    return Err(AgentRunError::Cancelled);
                }
                results.push(self.handoff(ctx, name, request).await);
            }
            results
        };

        Ok(indices
            .into_iter()
            .zip(results)
            .map(|(index, result)| {
                let message = result.to_message();
                self.fire(agent, "on_tool_end", |h| {
                    h.on_tool_end(name, &calls[index], &message, result.success)
                });
                (index, message)
            })
            .collect())
    }
}
