//! Per-tool rate limiting over a sliding window.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// At most `max_calls` invocations within any span of `window`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
    pub max_calls: usize,
    pub window: Duration,
}

impl RateLimit {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self { max_calls, window }
    }
}

/// Sliding-window limiter keyed by tool name.
///
/// Each tool keeps the instants of its recent calls; instants older than
/// the window are dropped before every check. Cloning copies the recorded
/// instants, so a clone starts with the same budget and then diverges.
#[derive(Debug, Default)]
pub struct RateLimiter {
    limits: HashMap<String, RateLimit>,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_limit(&mut self, tool: impl Into<String>, limit: RateLimit) {
        self.limits.insert(tool.into(), limit);
    }

    pub fn remove_limit(&mut self, tool: &str) {
        self.limits.remove(tool);
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(tool);
    }

    pub fn limit(&self, tool: &str) -> Option<RateLimit> {
        self.limits.get(tool).copied()
    }

    pub fn limited_tools(&self) -> usize {
        self.limits.len()
    }

    /// Record a call to `tool` if its budget allows, otherwise return the
    /// limit that refused it.
    pub fn try_acquire(&self, tool: &str) -> Result<(), RateLimit> {
        let Some(limit) = self.limits.get(tool) else {
            return Ok(());
        };

        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let calls = windows.entry(tool.to_string()).or_default();

        while calls
            .front()
            .is_some_and(|t| now.duration_since(*t) >= limit.window)
        {
            calls.pop_front();
        }

        if calls.len() >= limit.max_calls {
            return Err(*limit);
        }
        calls.push_back(now);
        Ok(())
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            limits: self.limits.clone(),
            windows: Mutex::new(
                self.windows
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone(),
            ),
        }
    }
}
