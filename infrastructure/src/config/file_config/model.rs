//! Model collaborator settings from TOML (`[model]` section)
//!
//! Exactly one source of decisions is used: a replay `script` wins over an
//! external `command`.
//!
//! ```toml
//! [model]
//! name = "gpt-5"
//! reasoning_effort = "high"
//! command = "agency-openai-bridge"
//! args = ["--stream=false"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model identifier passed to the collaborator with every request
    pub name: String,
    pub reasoning_effort: String,
    /// External program implementing the model-call contract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<String>,
    /// JSON script of recorded decisions to replay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            reasoning_effort: "medium".to_string(),
            command: None,
            args: Vec::new(),
            script: None,
        }
    }
}

impl FileModelConfig {
    /// Whether any decision source is configured
    pub fn has_source(&self) -> bool {
        self.script.is_some() || self.command.is_some()
    }
}
