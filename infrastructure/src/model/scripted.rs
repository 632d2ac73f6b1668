//! Scripted model caller: replays recorded decisions per agent.
//!
//! Used for demos, reproducible runs (`--script`) and tests. A script file
//! maps agent names to the decisions that agent makes, in order:
//!
//! ```json
//! {
//!   "planner": [
//!     {"type": "tool_calls", "calls": [{"name": "handoff", "arguments": {"toAgent": "coder", "message": "add a test"}}]},
//!     {"type": "final_answer", "content": "Done."}
//!   ],
//!   "coder": [
//!     {"delay_ms": 1500, "decision": {"type": "final_answer", "content": "Test added."}}
//!   ]
//! }
//! ```

use agency_application::ports::model_caller::{ModelCallError, ModelCaller, ModelRequest};
use agency_domain::ModelDecision;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors loading a script file
#[derive(Error, Debug)]
pub enum ScriptLoadError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScriptStep {
    Delayed {
        delay_ms: u64,
        decision: ModelDecision,
    },
    Plain(ModelDecision),
}

impl ScriptStep {
    fn into_parts(self) -> (Duration, ModelDecision) {
        match self {
            ScriptStep::Delayed { delay_ms, decision } => (Duration::from_millis(delay_ms), decision),
            ScriptStep::Plain(decision) => (Duration::ZERO, decision),
        }
    }
}

/// Replays decisions from per-agent queues.
///
/// An agent whose queue is empty gets a non-transient error, so a script
/// that is too short fails loudly instead of looping.
#[derive(Default)]
pub struct ScriptedModelCaller {
    queues: Mutex<HashMap<String, VecDeque<(Duration, ModelDecision)>>>,
    delays: HashMap<String, Duration>,
}

impl ScriptedModelCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ScriptLoadError> {
        let steps: HashMap<String, Vec<ScriptStep>> = serde_json::from_str(json)?;
        let queues = steps
            .into_iter()
            .map(|(agent, steps)| {
                let queue = steps.into_iter().map(ScriptStep::into_parts).collect();
                (agent, queue)
            })
            .collect();
        Ok(Self {
            queues: Mutex::new(queues),
            delays: HashMap::new(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ScriptLoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Queue a decision for `agent`
    pub fn push(self, agent: impl Into<String>, decision: ModelDecision) -> Self {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(agent.into())
            .or_default()
            .push_back((Duration::ZERO, decision));
        self
    }

    /// Delay applied to every call for `agent`, on top of per-step delays
    pub fn with_delay(mut self, agent: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(agent.into(), delay);
        self
    }

    /// Decisions still queued for `agent`
    pub fn remaining(&self, agent: &str) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(agent)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl ModelCaller for ScriptedModelCaller {
    async fn call(&self, request: &ModelRequest) -> Result<ModelDecision, ModelCallError> {
        let next = self
            .queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&request.agent)
            .and_then(VecDeque::pop_front);

        let Some((step_delay, decision)) = next else {
            return Err(ModelCallError::Rejected(format!(
                "no scripted decision left for agent '{}'",
                request.agent
            )));
        };

        let delay = step_delay + self.delays.get(&request.agent).copied().unwrap_or_default();
        if !delay.is_zero() {
            debug!(agent = %request.agent, delay_ms = delay.as_millis() as u64, "Scripted delay");
            tokio::time::sleep(delay).await;
        }
        Ok(decision)
    }
}
