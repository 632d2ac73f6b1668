//! Execution mode for simultaneous handoffs.

use serde::{Deserialize, Serialize};

/// How several handoffs requested in one model decision are executed.
///
/// | Mode | Execution | Isolation |
/// |------|-----------|-----------|
/// | `Sequential` | Inline on the caller, in request order | None needed |
/// | `Parallel` | One branch task per target, joined with a timeout | Forked registry, copied context, own call stack |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

impl ExecutionMode {
    pub fn from_flag(parallel: bool) -> Self {
        if parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, ExecutionMode::Parallel)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => f.write_str("sequential"),
            ExecutionMode::Parallel => f.write_str("parallel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(ExecutionMode::from_flag(false), ExecutionMode::Sequential);
        assert!(ExecutionMode::from_flag(true).is_parallel());
        assert_eq!(ExecutionMode::default().to_string(), "sequential");
    }
}
