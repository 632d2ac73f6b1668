//! Agency builder: validates the agent set and communication graph.

use super::agent::Agent;
use super::{Agency, AgencyInner};
use crate::config::AgencyConfig;
use crate::ports::agent_hooks::AgentHooks;
use crate::ports::model_caller::ModelCaller;
use crate::ports::tool_executor::ToolExecutorPort;
use agency_domain::{CommunicationGraph, DomainError, Edge, HandoffKind};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Collects agents, edges and settings, then checks them all at
/// [`build`](Self::build).
#[derive(Default)]
pub struct AgencyBuilder {
    agents: Vec<Agent>,
    edges: Vec<Edge>,
    entry: Option<String>,
    config: AgencyConfig,
    hooks: Vec<Arc<dyn AgentHooks>>,
}

impl AgencyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>, kind: HandoffKind) -> Self {
        self.edges.push(Edge::new(from, to, kind));
        self
    }

    /// Entry agent for [`Agency::process`]. Defaults to the first agent added.
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    pub fn config(mut self, config: AgencyConfig) -> Self {
        self.config = config;
        self
    }

    /// Agency-level hooks, fired for every agent
    pub fn hooks(mut self, hooks: Arc<dyn AgentHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn build(
        self,
        registry: Arc<dyn ToolExecutorPort>,
        model_caller: Arc<dyn ModelCaller>,
    ) -> Result<Agency, DomainError> {
        let mut graph = CommunicationGraph::new();
        let mut agents = HashMap::with_capacity(self.agents.len());
        let first = self.agents.first().map(|a| a.name().to_string());

        for agent in &self.agents {
            graph.add_agent(agent.name())?;
        }

        for agent in self.agents {
            if let Some(tool) = agent.profile().tools.iter().find(|t| !registry.has_tool(t)) {
                return Err(DomainError::UnknownTool {
                    agent: agent.name().to_string(),
                    tool: tool.clone(),
                });
            }
            if let Some(parent) = &agent.profile().parent
                && !graph.contains_agent(parent)
            {
                return Err(DomainError::UnknownAgent(parent.clone()));
            }
            agents.insert(agent.name().to_string(), Arc::new(agent));
        }

        for edge in self.edges {
            graph.add_edge(edge)?;
        }

        let entry = match self.entry {
            Some(entry) if graph.contains_agent(&entry) => entry,
            Some(entry) => return Err(DomainError::UnknownAgent(entry)),
            None => first.ok_or(DomainError::NoEntryAgent)?,
        };

        debug!(
            agents = agents.len(),
            edges = graph.edges().len(),
            entry = %entry,
            mode = %self.config.mode,
            "Agency built"
        );

        Ok(Agency {
            inner: Arc::new(AgencyInner {
                agents,
                graph,
                entry,
                registry,
                model_caller,
                hooks: self.hooks,
                config: self.config,
            }),
        })
    }
}
