//! Terminal interaction: dangerous-tool confirmation and result output.
//!
//! A dangerous tool call pauses the run and asks on stderr:
//!
//! ```text
//! ── Confirm dangerous tool: write_file ──
//!   path: "src/lib.rs"
//!   content: "pub fn ..."
//! Run it? [y]es / [a]lways / [N]o:
//! ```

use agency_application::{AgentOutput, AgentRunError, ConfirmationDecision, ConfirmationPort};
use agency_domain::core::string::truncate;
use agency_domain::{ToolCall, ToolDefinition};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Longest argument value shown in a confirmation prompt
const ARG_PREVIEW: usize = 200;

/// Asks the user before each dangerous tool call.
///
/// Parallel branches may ask at the same time; prompts are serialized so
/// answers go to the right question.
#[derive(Default)]
pub struct ConsoleConfirmation {
    prompt_lock: Mutex<()>,
}

impl ConsoleConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    fn display_prompt(&self, tool: &ToolDefinition, call: &ToolCall) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "\n{}",
            format!("── Confirm dangerous tool: {} ──", tool.name).yellow().bold()
        );

        let mut args: Vec<_> = call.arguments.iter().collect();
        args.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in args {
            let _ = writeln!(stderr, "  {}: {}", name.cyan(), truncate(&value.to_string(), ARG_PREVIEW));
        }
        let _ = write!(stderr, "{} ", "Run it? [y]es / [a]lways / [N]o:".bold());
        let _ = stderr.flush();
    }
}

impl ConfirmationPort for ConsoleConfirmation {
    fn confirm(&self, tool: &ToolDefinition, call: &ToolCall) -> ConfirmationDecision {
        let _guard = self.prompt_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.display_prompt(tool, call);

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => ConfirmationDecision::Reject("no answer on stdin".to_string()),
            Ok(_) => parse_answer(&line),
        }
    }
}

/// Interpret a confirmation answer; anything but yes/always rejects.
pub fn parse_answer(line: &str) -> ConfirmationDecision {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => ConfirmationDecision::Approve,
        "a" | "always" => ConfirmationDecision::ApproveAlways,
        "" => ConfirmationDecision::Reject("declined".to_string()),
        other => ConfirmationDecision::Reject(format!("declined ({})", other)),
    }
}

pub fn print_header(entry: &str, agents: &[&str], parallel: bool, input: &str) {
    println!();
    println!("{} {}", "Task:".cyan().bold(), input);
    println!(
        "{} {} (entry: {}, {})",
        "Agents:".cyan().bold(),
        agents.join(", "),
        entry.bold(),
        if parallel { "parallel" } else { "sequential" }
    );
    println!();
}

pub fn print_output(output: &AgentOutput, quiet: bool) {
    if quiet {
        println!("{}", output.response);
        return;
    }
    println!("{}", format!("── {} ──", output.agent).green().bold());
    println!("{}", output.response);
    println!(
        "\n{}",
        format!("{} model turns, {} tool calls", output.turns, output.tool_calls).dimmed()
    );
}

/// Show whatever the entry agent produced before it failed
pub fn print_partial(error: &AgentRunError) {
    if let Some(partial) = error.partial_response() {
        println!("{}", "── Partial answer ──".yellow().bold());
        println!("{}", partial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y\n"), ConfirmationDecision::Approve);
        assert_eq!(parse_answer(" YES "), ConfirmationDecision::Approve);
        assert_eq!(parse_answer("a"), ConfirmationDecision::ApproveAlways);
        assert!(!parse_answer("\n").is_approved());
        assert!(!parse_answer("maybe").is_approved());
    }
}
