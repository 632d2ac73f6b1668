//! `get_time`: current date and time.

use crate::tools::registry::Tool;
use agency_domain::{ToolArguments, ToolDefinition, ToolParameter};
use chrono::{Local, Utc};
use std::fmt::Write;

pub const GET_TIME: &str = "get_time";

const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

pub fn get_time_tool() -> Tool {
    Tool::new(
        ToolDefinition::new(GET_TIME, "Get the current date and time")
            .with_parameter(
                ToolParameter::new("timezone", "Which clock to read", false)
                    .with_choices(["utc", "local"])
                    .with_default("utc"),
            )
            .with_parameter(
                ToolParameter::new("format", "strftime-style format string", false)
                    .with_default(DEFAULT_FORMAT),
            ),
        execute_get_time,
    )
}

fn execute_get_time(arguments: &ToolArguments) -> Result<String, String> {
    let format = arguments
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_FORMAT);
    let local = arguments.get("timezone").and_then(|v| v.as_str()) == Some("local");

    // chrono reports bad format strings as a fmt::Error at render time
    let mut out = String::new();
    let rendered = if local {
        write!(out, "{}", Local::now().format(format))
    } else {
        write!(out, "{}", Utc::now().format(format))
    };
    rendered.map_err(|_| format!("Invalid time format '{}'", format))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_formats() {
        let mut args = ToolArguments::new();
        args.insert("format".into(), json!("%Y"));
        let year = execute_get_time(&args).unwrap();
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));

        args.insert("timezone".into(), json!("local"));
        assert!(execute_get_time(&args).is_ok());
    }

    #[test]
    fn test_invalid_format() {
        let mut args = ToolArguments::new();
        args.insert("format".into(), json!("%Q"));
        assert!(execute_get_time(&args).unwrap_err().contains("Invalid time format"));
    }
}
