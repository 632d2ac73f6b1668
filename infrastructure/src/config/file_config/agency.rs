//! Agency settings from TOML (`[agency]` section)
//!
//! ```toml
//! [agency]
//! entry = "planner"
//! parallel = true
//! branch_timeout_seconds = 300
//! max_handoff_depth = 4
//! ```

use agency_application::AgencyConfig;
use agency_domain::ExecutionMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgencySettings {
    /// Entry agent; defaults to the first configured agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Run simultaneous handoffs as parallel branches
    pub parallel: bool,
    pub branch_timeout_seconds: u64,
    pub max_handoff_depth: usize,
    pub max_turns: usize,
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
    pub model_call_timeout_seconds: u64,
}

impl Default for FileAgencySettings {
    fn default() -> Self {
        let defaults = AgencyConfig::default();
        Self {
            entry: None,
            parallel: defaults.mode.is_parallel(),
            branch_timeout_seconds: defaults.branch_timeout.as_secs(),
            max_handoff_depth: defaults.max_handoff_depth,
            max_turns: defaults.max_turns,
            max_retries: defaults.max_retries,
            retry_base_delay_ms: defaults.retry_base_delay.as_millis() as u64,
            retry_max_delay_ms: defaults.retry_max_delay.as_millis() as u64,
            model_call_timeout_seconds: defaults.model_call_timeout.as_secs(),
        }
    }
}

impl FileAgencySettings {
    pub fn to_agency_config(&self) -> AgencyConfig {
        AgencyConfig::default()
            .with_mode(ExecutionMode::from_flag(self.parallel))
            .with_branch_timeout(Duration::from_secs(self.branch_timeout_seconds))
            .with_max_handoff_depth(self.max_handoff_depth)
            .with_max_turns(self.max_turns)
            .with_max_retries(self.max_retries)
            .with_retry_delays(
                Duration::from_millis(self.retry_base_delay_ms),
                Duration::from_millis(self.retry_max_delay_ms),
            )
            .with_model_call_timeout(Duration::from_secs(self.model_call_timeout_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_agency_config() {
        assert_eq!(
            FileAgencySettings::default().to_agency_config(),
            AgencyConfig::default()
        );
    }

    #[test]
    fn test_to_agency_config() {
        let settings: FileAgencySettings = toml::from_str(
            r#"
parallel = true
branch_timeout_seconds = 2
max_turns = 5
"#,
        )
        .unwrap();

        let config = settings.to_agency_config();
        assert!(config.mode.is_parallel());
        assert_eq!(config.branch_timeout, Duration::from_secs(2));
        assert_eq!(config.max_turns, 5);
        // Unset fields keep their defaults
        assert_eq!(config.max_handoff_depth, 8);
    }
}
