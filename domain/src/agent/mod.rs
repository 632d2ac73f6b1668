//! Agent domain module
//!
//! Agent profiles, turn phases, conversation turns and model decisions.

pub mod entities;
pub mod value_objects;

pub use entities::{AgentPhase, AgentProfile, ReasoningEffort};
pub use value_objects::{ModelDecision, Turn, TurnRole};
