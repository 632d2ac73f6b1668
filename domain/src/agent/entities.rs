//! Agent domain entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How much deliberation the model collaborator should spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    #[default]
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }

    /// Parse leniently, falling back to [`ReasoningEffort::Medium`].
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::str::FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "minimal" => Ok(ReasoningEffort::Low),
            "medium" | "default" => Ok(ReasoningEffort::Medium),
            "high" | "max" => Ok(ReasoningEffort::High),
            other => Err(format!("Unknown reasoning effort: {}", other)),
        }
    }
}

impl std::fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of an agent: identity, instructions and tool binding.
///
/// `parent` records which agent this one was derived from, by name only.
/// It is provenance, never ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Unique within an agency
    pub name: String,
    pub role: String,
    pub system_prompt: String,
    /// Names of the registry tools this agent may invoke
    #[serde(default)]
    pub tools: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub model: String,
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
}

impl AgentProfile {
    pub fn new(name: impl Into<String>, role: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            system_prompt: String::new(),
            tools: BTreeSet::new(),
            parent: None,
            model: model.into(),
            reasoning_effort: ReasoningEffort::default(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.insert(tool.into());
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools.extend(tools.into_iter().map(Into::into));
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }

    pub fn can_use(&self, tool_name: &str) -> bool {
        self.tools.contains(tool_name)
    }
}

/// Phase of a single agent turn.
///
/// ```text
/// AwaitingInput ──▶ ModelCall ──▶ FinalAnswer
///                     ▲    │
///                     │    ▼
///                     └─ ToolCalls
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentPhase {
    AwaitingInput,
    ModelCall,
    ToolCalls,
    FinalAnswer,
}

impl AgentPhase {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: AgentPhase) -> bool {
        matches!(
            (self, next),
            (AgentPhase::AwaitingInput, AgentPhase::ModelCall)
                | (AgentPhase::ModelCall, AgentPhase::ToolCalls)
                | (AgentPhase::ModelCall, AgentPhase::FinalAnswer)
                | (AgentPhase::ToolCalls, AgentPhase::ModelCall)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentPhase::FinalAnswer)
    }
}

impl std::fmt::Display for AgentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentPhase::AwaitingInput => "awaiting_input",
            AgentPhase::ModelCall => "model_call",
            AgentPhase::ToolCalls => "tool_calls",
            AgentPhase::FinalAnswer => "final_answer",
        };
        f.write_str(s)
    }
}
