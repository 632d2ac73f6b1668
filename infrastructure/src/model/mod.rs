//! Model caller adapters
//!
//! - [`ScriptedModelCaller`] - replays decisions from a script
//! - [`ProcessModelCaller`] - delegates each call to an external command

pub mod process;
pub mod scripted;

pub use process::ProcessModelCaller;
pub use scripted::{ScriptLoadError, ScriptedModelCaller};
