//! CLI command definitions

use agency_infrastructure::FileConfig;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for agency
#[derive(Parser, Debug)]
#[command(name = "agency")]
#[command(author, version, about = "Route a task through a team of tool-using agents")]
#[command(long_about = r#"
agency hands your task to an entry agent. Agents call tools and delegate to
each other along the edges of a communication graph; the entry agent's
final answer is printed.

Without [[agents]] in the config, a planner / coder / reviewer team is used:
  planner -> coder, planner -> reviewer, coder -> reviewer

Configuration is loaded from (highest priority first):
1. Command line flags
2. AGENCY_* environment variables (AGENCY_AGENCY__PARALLEL=true)
3. --config <path>
4. ./agency.toml or ./.agency.toml
5. ~/.config/agency/config.toml

Example:
  agency --model-command ./bridge.sh "Add a unit test for the parser"
  agency --script demo.json --parallel --branch-timeout 30 "Review src/"
"#)]
pub struct Cli {
    /// The task for the entry agent
    pub input: Option<String>,

    /// Run simultaneous handoffs as parallel branches
    #[arg(long)]
    pub parallel: bool,

    /// Timeout for each parallel branch, in seconds
    #[arg(long, value_name = "SECS")]
    pub branch_timeout: Option<u64>,

    /// Replay model decisions from a JSON script
    #[arg(long, value_name = "PATH", conflicts_with = "model_command")]
    pub script: Option<PathBuf>,

    /// External program that answers model calls (JSON over stdin/stdout)
    #[arg(long, value_name = "CMD")]
    pub model_command: Option<String>,

    /// Argument for --model-command (can be specified multiple times)
    #[arg(
        long = "model-arg",
        value_name = "ARG",
        requires = "model_command",
        allow_hyphen_values = true
    )]
    pub model_args: Vec<String>,

    /// Model identifier passed to the model collaborator
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Reasoning effort: low, medium or high
    #[arg(long, value_name = "LEVEL")]
    pub reasoning_effort: Option<String>,

    /// Maximum model calls per agent run
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Approve dangerous tools without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the final answer
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply command line flags on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut FileConfig) {
        if self.parallel {
            config.agency.parallel = true;
        }
        if let Some(secs) = self.branch_timeout {
            config.agency.branch_timeout_seconds = secs;
        }
        if let Some(max) = self.max_turns {
            config.agency.max_turns = max;
        }
        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(effort) = &self.reasoning_effort {
            config.model.reasoning_effort = effort.clone();
        }
        // A source given on the command line replaces the configured one
        if let Some(script) = &self.script {
            config.model.script = Some(script.clone());
            config.model.command = None;
        }
        if let Some(command) = &self.model_command {
            config.model.command = Some(command.clone());
            config.model.args = self.model_args.clone();
            config.model.script = None;
        }
        if self.yes {
            config.tools.auto_approve_dangerous = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "agency",
            "--parallel",
            "--branch-timeout",
            "30",
            "--model-command",
            "bridge",
            "--model-arg",
            "--fast",
            "--max-turns",
            "4",
            "-y",
            "do it",
        ]);

        let mut config = FileConfig::default();
        config.model.script = Some("old.json".into());
        cli.apply_overrides(&mut config);

        assert_eq!(cli.input.as_deref(), Some("do it"));
        assert!(config.agency.parallel);
        assert_eq!(config.agency.branch_timeout_seconds, 30);
        assert_eq!(config.agency.max_turns, 4);
        assert_eq!(config.model.command.as_deref(), Some("bridge"));
        assert_eq!(config.model.args, vec!["--fast"]);
        assert!(config.model.script.is_none());
        assert!(config.tools.auto_approve_dangerous);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["agency", "hello"]);
        let mut config = FileConfig::default();
        config.agency.branch_timeout_seconds = 99;
        cli.apply_overrides(&mut config);

        assert_eq!(config, {
            let mut expected = FileConfig::default();
            expected.agency.branch_timeout_seconds = 99;
            expected
        });
    }

    #[test]
    fn test_script_conflicts_with_command() {
        assert!(
            Cli::try_parse_from(["agency", "--script", "a.json", "--model-command", "b", "x"])
                .is_err()
        );
    }
}
