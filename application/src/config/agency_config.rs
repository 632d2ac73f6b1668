//! Agency execution parameters.
//!
//! [`AgencyConfig`] groups the static parameters that control the turn loop
//! and the handoff machinery. The infrastructure config loader fills it from
//! files, environment and CLI flags.

use agency_domain::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop and handoff control parameters.
///
/// | Parameter | Default | Applies to |
/// |-----------|---------|------------|
/// | `mode` | sequential | simultaneous handoffs |
/// | `branch_timeout` | 600s | each parallel branch |
/// | `max_handoff_depth` | 8 | nested handoffs |
/// | `max_turns` | 20 | model calls per agent run |
/// | `max_retries` | 3 | transient model call failures |
/// | `model_call_timeout` | 120s | each model call attempt |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyConfig {
    pub mode: ExecutionMode,
    pub branch_timeout: Duration,
    pub max_handoff_depth: usize,
    pub max_turns: usize,
    pub max_retries: usize,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub model_call_timeout: Duration,
}

impl Default for AgencyConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            branch_timeout: Duration::from_secs(600),
            max_handoff_depth: 8,
            max_turns: 20,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(8),
            model_call_timeout: Duration::from_secs(120),
        }
    }
}

impl AgencyConfig {
    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_branch_timeout(mut self, timeout: Duration) -> Self {
        self.branch_timeout = timeout;
        self
    }

    pub fn with_max_handoff_depth(mut self, depth: usize) -> Self {
        self.max_handoff_depth = depth;
        self
    }

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_retry_delays(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base_delay = base;
        self.retry_max_delay = max;
        self
    }

    pub fn with_model_call_timeout(mut self, timeout: Duration) -> Self {
        self.model_call_timeout = timeout;
        self
    }

    /// Delay before retry number `attempt` (1-based): exponential from
    /// `retry_base_delay`, capped at `retry_max_delay`.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.retry_max_delay)
    }
}
