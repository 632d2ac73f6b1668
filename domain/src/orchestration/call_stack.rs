//! Call stack of nested handoffs.

use serde::{Deserialize, Serialize};

/// Ordered record of the agents currently executing nested handoffs.
///
/// The orchestrator pushes a frame when a handoff starts and pops it when
/// the handoff returns, on every exit path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStack {
    frames: Vec<String>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, agent: impl Into<String>) {
        self.frames.push(agent.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.frames.pop()
    }

    /// Agent of the innermost frame
    pub fn current(&self) -> Option<&str> {
        self.frames.last().map(|s| s.as_str())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.frames.iter().any(|f| f == agent)
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }
}

impl std::fmt::Display for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.frames.is_empty() {
            return f.write_str("<empty>");
        }
        f.write_str(&self.frames.join(" > "))
    }
}
