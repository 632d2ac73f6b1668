//! Agency use case: agents, the communication graph and handoffs.
//!
//! An [`Agency`] owns a fixed set of [`Agent`]s and the graph of who may
//! delegate to whom. [`Agency::process`] runs the entry agent's turn loop;
//! agents with outgoing edges are offered the `handoff` tool, which the
//! agency intercepts and executes itself.
//!
//! # Flow
//!
//! ```text
//! process(input)
//!   └─ run_agent(entry)
//!        ├─ ModelCall ──▶ FinalAnswer ──▶ done
//!        └─ ToolCalls
//!             ├─ registry tools ──▶ result strings
//!             └─ handoff calls
//!                  ├─ sequential: push, run_agent(target), pop
//!                  └─ parallel:   one tokio task per target, joined with timeout
//! ```

mod agent;
mod builder;
mod context;
mod handoff;
pub mod roles;
mod turn;
mod types;

pub use agent::Agent;
pub use builder::AgencyBuilder;
pub use context::ExecutionContext;
pub use roles::{create_coder_agent, create_planner_agent, create_reviewer_agent};
pub use types::{AgentOutput, AgentRunError};

use crate::config::AgencyConfig;
use crate::hooks::dispatch;
use crate::ports::agent_hooks::{AgentHooks, HookResult};
use crate::ports::model_caller::ModelCaller;
use crate::ports::tool_executor::ToolExecutorPort;
use agency_domain::CommunicationGraph;
use std::collections::HashMap;
use std::sync::Arc;

/// A validated set of agents and their communication graph.
///
/// Cheap to clone; parallel branches each hold a clone.
#[derive(Clone)]
pub struct Agency {
    inner: Arc<AgencyInner>,
}

struct AgencyInner {
    agents: HashMap<String, Arc<Agent>>,
    graph: CommunicationGraph,
    entry: String,
    registry: Arc<dyn ToolExecutorPort>,
    model_caller: Arc<dyn ModelCaller>,
    hooks: Vec<Arc<dyn AgentHooks>>,
    config: AgencyConfig,
}

impl Agency {
    pub fn builder() -> AgencyBuilder {
        AgencyBuilder::new()
    }

    pub fn entry(&self) -> &str {
        &self.inner.entry
    }

    pub fn config(&self) -> &AgencyConfig {
        &self.inner.config
    }

    pub fn graph(&self) -> &CommunicationGraph {
        &self.inner.graph
    }

    pub fn registry(&self) -> &Arc<dyn ToolExecutorPort> {
        &self.inner.registry
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.inner.agents.get(name).map(|a| a.as_ref())
    }

    /// Agent names, sorted
    pub fn agent_names(&self) -> Vec<&str> {
        self.inner.graph.agents().collect()
    }

    /// Fresh context: empty history, empty call stack, shared registry
    pub fn new_context(&self) -> ExecutionContext {
        ExecutionContext::new(
            Arc::clone(&self.inner.registry),
            Arc::clone(&self.inner.model_caller),
        )
    }

    /// Run the entry agent on `input` in a fresh context
    pub async fn process(&self, input: &str) -> Result<String, AgentRunError> {
        let mut ctx = self.new_context();
        self.process_with_context(&mut ctx, input)
            .await
            .map(|output| output.response)
    }

    /// Run the entry agent on `input` in a caller-supplied context
    pub async fn process_with_context(
        &self,
        ctx: &mut ExecutionContext,
        input: &str,
    ) -> Result<AgentOutput, AgentRunError> {
        self.run(&self.inner.entry, ctx, input).await
    }

    /// Run any agent of this agency directly, bypassing the entry agent
    pub async fn run(
        &self,
        agent: &str,
        ctx: &mut ExecutionContext,
        input: &str,
    ) -> Result<AgentOutput, AgentRunError> {
        let agent = self
            .agent_arc(agent)
            .ok_or_else(|| AgentRunError::UnknownAgent(agent.to_string()))?;
        self.run_agent(&agent, ctx, input).await
    }

    fn agent_arc(&self, name: &str) -> Option<Arc<Agent>> {
        self.inner.agents.get(name).cloned()
    }

    /// Fire one hook event on the agency hooks, then on the agent's own.
    fn fire<F>(&self, agent: &Agent, event: &'static str, mut f: F)
    where
        F: FnMut(&dyn AgentHooks) -> HookResult,
    {
        for hooks in self.inner.hooks.iter().chain(agent.hooks()) {
            dispatch(hooks.as_ref(), event, &mut f);
        }
    }
}

impl std::fmt::Debug for Agency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agency")
            .field("entry", &self.inner.entry)
            .field("agents", &self.agent_names())
            .field("edges", &self.inner.graph.edges().len())
            .field("config", &self.inner.config)
            .finish()
    }
}
