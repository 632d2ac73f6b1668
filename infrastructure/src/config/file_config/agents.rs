//! Agent roster and communication graph from TOML (`[[agents]]`, `[[edges]]`)
//!
//! ```toml
//! [[agents]]
//! name = "researcher"
//! role = "Researcher"
//! system_prompt = "Answer questions about the codebase."
//! tools = ["read_file"]
//!
//! [[edges]]
//! from = "planner"
//! to = "researcher"
//! kind = "send_message"
//! ```

use agency_domain::{AgentProfile, Edge, HandoffKind, ReasoningEffort};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub name: String,
    pub role: String,
    pub system_prompt: String,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Overrides `[model].name` for this agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

impl FileAgentConfig {
    /// Build the profile, falling back to the shared model settings
    pub fn to_profile(&self, default_model: &str, default_effort: ReasoningEffort) -> AgentProfile {
        let role = if self.role.is_empty() { &self.name } else { &self.role };
        let effort = self
            .reasoning_effort
            .as_deref()
            .map_or(default_effort, ReasoningEffort::parse_lossy);

        let mut profile = AgentProfile::new(
            &self.name,
            role,
            self.model.as_deref().unwrap_or(default_model),
        )
        .with_system_prompt(&self.system_prompt)
        .with_tools(self.tools.iter().cloned())
        .with_reasoning_effort(effort);

        if let Some(parent) = &self.parent {
            profile = profile.with_parent(parent);
        }
        profile
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdgeConfig {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: HandoffKind,
}

impl From<&FileEdgeConfig> for Edge {
    fn from(edge: &FileEdgeConfig) -> Self {
        Edge::new(&edge.from, &edge.to, edge.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_falls_back_to_shared_model() {
        let agent = FileAgentConfig {
            name: "researcher".into(),
            tools: vec!["read_file".into()],
            reasoning_effort: Some("high".into()),
            ..Default::default()
        };

        let profile = agent.to_profile("gpt-test", ReasoningEffort::Low);
        assert_eq!(profile.model, "gpt-test");
        assert_eq!(profile.role, "researcher");
        assert_eq!(profile.reasoning_effort, ReasoningEffort::High);
        assert!(profile.can_use("read_file"));
        assert!(profile.parent.is_none());
    }

    #[test]
    fn test_edge_kind_defaults_to_send_message() {
        let edge: FileEdgeConfig = toml::from_str("from = \"a\"\nto = \"b\"").unwrap();
        assert_eq!(Edge::from(&edge).kind, HandoffKind::SendMessage);
    }
}
