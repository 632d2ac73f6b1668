//! Agent: a profile plus optional per-agent hooks.

use crate::ports::agent_hooks::AgentHooks;
use agency_domain::AgentProfile;
use std::sync::Arc;

/// A named role the agency can run.
///
/// Immutable once handed to the [`AgencyBuilder`](super::AgencyBuilder).
#[derive(Clone)]
pub struct Agent {
    profile: AgentProfile,
    hooks: Option<Arc<dyn AgentHooks>>,
    max_turns: Option<usize>,
}

impl Agent {
    pub fn new(profile: AgentProfile) -> Self {
        Self {
            profile,
            hooks: None,
            max_turns: None,
        }
    }

    /// Hooks fired for this agent only
    pub fn with_hooks(mut self, hooks: Arc<dyn AgentHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Override the agency-wide turn limit for this agent
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn hooks(&self) -> Option<&Arc<dyn AgentHooks>> {
        self.hooks.as_ref()
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }
}

impl From<AgentProfile> for Agent {
    fn from(profile: AgentProfile) -> Self {
        Self::new(profile)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("profile", &self.profile)
            .field("hooks", &self.hooks.is_some())
            .field("max_turns", &self.max_turns)
            .finish()
    }
}
