//! Factories for the built-in agent roles.
//!
//! The default agency wires these three together:
//!
//! ```text
//! planner ──▶ coder ──▶ reviewer
//!    └──────────────────────▲
//! ```

use super::agent::Agent;
use agency_domain::{AgentProfile, ReasoningEffort};

pub const PLANNER: &str = "planner";
pub const CODER: &str = "coder";
pub const REVIEWER: &str = "reviewer";

const PLANNER_PROMPT: &str = "You are the planner. Break the user's request into concrete steps \
and delegate implementation to the coder and verification to the reviewer. \
Combine their answers into one final response.";

const CODER_PROMPT: &str = "You are the coder. Carry out the task you are given using the file \
tools. Keep changes minimal and report exactly what you changed.";

const REVIEWER_PROMPT: &str = "You are the reviewer. Read the relevant files and check the work \
you are given for mistakes. Answer with concrete findings or an explicit approval.";

fn profile(name: &str, role: &str, model: &str, reasoning_effort: &str) -> AgentProfile {
    AgentProfile::new(name, role, model)
        .with_reasoning_effort(ReasoningEffort::parse_lossy(reasoning_effort))
}

pub fn create_planner_agent(model: &str, reasoning_effort: &str) -> Agent {
    Agent::new(
        profile(PLANNER, "Planner", model, reasoning_effort)
            .with_system_prompt(PLANNER_PROMPT)
            .with_tools(["calculator", "get_time"]),
    )
}

pub fn create_coder_agent(model: &str, reasoning_effort: &str) -> Agent {
    Agent::new(
        profile(CODER, "Coder", model, reasoning_effort)
            .with_system_prompt(CODER_PROMPT)
            .with_tools(["read_file", "write_file", "edit_file", "calculator"])
            .with_parent(PLANNER),
    )
}

pub fn create_reviewer_agent(model: &str, reasoning_effort: &str) -> Agent {
    Agent::new(
        profile(REVIEWER, "Reviewer", model, reasoning_effort)
            .with_system_prompt(REVIEWER_PROMPT)
            .with_tools(["read_file"])
            .with_parent(PLANNER),
    )
}
