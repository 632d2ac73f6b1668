//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into
//! application types happens in [`crate::assembly`].

mod agency;
mod agents;
mod model;
mod tools;

pub use agency::FileAgencySettings;
pub use agents::{FileAgentConfig, FileEdgeConfig};
pub use model::{DEFAULT_MODEL, FileModelConfig};
pub use tools::{DEFAULT_REMINDER, FileRateLimit, FileToolsConfig};

use agency_domain::ReasoningEffort;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value the config file may not contain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} must be greater than zero")]
    ZeroValue { field: String },

    #[error("agents[{index}] has an empty name")]
    EmptyAgentName { index: usize },

    #[error("tools.rate_limits.{tool}: window_seconds must be greater than zero")]
    ZeroRateLimitWindow { tool: String },

    #[error("{field}: unknown reasoning effort '{value}' (expected low, medium or high)")]
    InvalidReasoningEffort { field: String, value: String },

    #[error("edges[{index}] references unknown agent '{agent}'")]
    UnknownEdgeAgent { index: usize, agent: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agency: FileAgencySettings,
    pub model: FileModelConfig,
    pub tools: FileToolsConfig,
    /// Custom roster; empty means the built-in planner/coder/reviewer agency
    pub agents: Vec<FileAgentConfig>,
    pub edges: Vec<FileEdgeConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let positive = [
            ("agency.branch_timeout_seconds", self.agency.branch_timeout_seconds),
            ("agency.model_call_timeout_seconds", self.agency.model_call_timeout_seconds),
            ("agency.max_turns", self.agency.max_turns as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                errors.push(ConfigValidationError::ZeroValue {
                    field: field.to_string(),
                });
            }
        }

        check_effort(&mut errors, "model.reasoning_effort", &self.model.reasoning_effort);

        for (index, agent) in self.agents.iter().enumerate() {
            if agent.name.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyAgentName { index });
            }
            if let Some(effort) = &agent.reasoning_effort {
                check_effort(&mut errors, &format!("agents[{}].reasoning_effort", index), effort);
            }
        }

        // Edges between built-in agents are checked when the agency is built
        if !self.agents.is_empty() {
            for (index, edge) in self.edges.iter().enumerate() {
                for agent in [&edge.from, &edge.to] {
                    if !self.agents.iter().any(|a| &a.name == agent) {
                        errors.push(ConfigValidationError::UnknownEdgeAgent {
                            index,
                            agent: agent.clone(),
                        });
                    }
                }
            }
        }

        let mut limited: Vec<_> = self.tools.rate_limits.iter().collect();
        limited.sort_by(|a, b| a.0.cmp(b.0));
        for (tool, limit) in limited {
            if limit.window_seconds == 0 {
                errors.push(ConfigValidationError::ZeroRateLimitWindow { tool: tool.clone() });
            }
            if limit.max_calls == 0 {
                errors.push(ConfigValidationError::ZeroValue {
                    field: format!("tools.rate_limits.{}.max_calls", tool),
                });
            }
        }

        errors
    }
}

fn check_effort(errors: &mut Vec<ConfigValidationError>, field: &str, value: &str) {
    if value.parse::<ReasoningEffort>().is_err() {
        errors.push(ConfigValidationError::InvalidReasoningEffort {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_domain::HandoffKind;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agency]
entry = "lead"
parallel = true
branch_timeout_seconds = 30

[model]
name = "gpt-test"
command = "model-bridge"
args = ["--json"]

[tools]
reminder_interval = 3

[tools.rate_limits.write_file]
max_calls = 2
window_seconds = 60

[[agents]]
name = "lead"
tools = ["calculator"]

[[agents]]
name = "helper"
parent = "lead"

[[edges]]
from = "lead"
to = "helper"
kind = "transfer"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agency.entry.as_deref(), Some("lead"));
        assert!(config.agency.parallel);
        assert_eq!(config.model.command.as_deref(), Some("model-bridge"));
        assert_eq!(config.tools.rate_limits["write_file"].max_calls, 2);
        assert_eq!(config.agents.len(), 2);
        assert_eq!(config.agents[1].parent.as_deref(), Some("lead"));
        assert_eq!(config.edges[0].kind, HandoffKind::Transfer);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[model]\nname = \"small\"\n").unwrap();
        assert_eq!(config.model.name, "small");
        assert_eq!(config.model.reasoning_effort, "medium");
        assert!(config.agents.is_empty());
        assert!(!config.agency.parallel);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let toml_str = r#"
[agency]
branch_timeout_seconds = 0
max_turns = 0

[model]
reasoning_effort = "extreme"

[tools.rate_limits.calculator]
max_calls = 1
window_seconds = 0

[[agents]]
name = " "

[[edges]]
from = " "
to = "ghost"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let errors = config.validate();

        assert!(errors.contains(&ConfigValidationError::ZeroValue {
            field: "agency.branch_timeout_seconds".into()
        }));
        assert!(errors.contains(&ConfigValidationError::ZeroValue {
            field: "agency.max_turns".into()
        }));
        assert!(errors.contains(&ConfigValidationError::EmptyAgentName { index: 0 }));
        assert!(errors.contains(&ConfigValidationError::ZeroRateLimitWindow {
            tool: "calculator".into()
        }));
        assert!(errors.contains(&ConfigValidationError::UnknownEdgeAgent {
            index: 0,
            agent: "ghost".into()
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidReasoningEffort { .. })));
    }
}
