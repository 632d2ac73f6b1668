//! Tool registry settings from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! auto_approve_dangerous = false
//! reminder_interval = 5
//!
//! [tools.rate_limits.write_file]
//! max_calls = 10
//! window_seconds = 60
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_REMINDER: &str = "Reminder: stay within the task you were given. \
Delegate work outside your role with the handoff tool and report what you changed.";

/// Sliding-window limit for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRateLimit {
    pub max_calls: usize,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Approve dangerous tools without asking
    pub auto_approve_dangerous: bool,
    /// Inject `reminder` after this many tool calls (0 disables)
    pub reminder_interval: usize,
    pub reminder: String,
    pub rate_limits: HashMap<String, FileRateLimit>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            auto_approve_dangerous: false,
            reminder_interval: 0,
            reminder: DEFAULT_REMINDER.to_string(),
            rate_limits: HashMap::new(),
        }
    }
}
