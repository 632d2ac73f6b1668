//! Built-in tools that need nothing beyond the standard library and chrono.
//!
//! - `calculator` - arithmetic expressions
//! - `get_time` - current date and time
//!
//! File tools live in [`crate::tools::file`].

pub mod calculator;
pub mod clock;

pub use calculator::{CALCULATOR, calculator_tool};
pub use clock::{GET_TIME, get_time_tool};

use crate::tools::registry::Tool;

/// `[calculator, get_time]`
pub fn builtin_tools() -> Vec<Tool> {
    vec![calculator_tool(), get_time_tool()]
}
