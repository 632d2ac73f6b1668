//! File operation tools: read_file, write_file, edit_file
//!
//! `write_file` and `edit_file` are dangerous and run under [`WRITE_LOCK`],
//! so writes from parallel branches never interleave.

use crate::tools::registry::Tool;
use agency_domain::{ParamType, ToolArguments, ToolDefinition, ToolParameter};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const EDIT_FILE: &str = "edit_file";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Serializes every file mutation in the process
pub static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// `[read_file, write_file, edit_file]`
pub fn file_tools() -> Vec<Tool> {
    vec![read_file_tool(), write_file_tool(), edit_file_tool()]
}

pub fn read_file_tool() -> Tool {
    Tool::new(
        ToolDefinition::new(READ_FILE, "Read the contents of a file at the specified path")
            .with_parameter(
                ToolParameter::new("path", "Path to the file to read", true)
                    .with_type(ParamType::Path),
            )
            .with_parameter(
                ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
                    .with_type(ParamType::Integer),
            )
            .with_parameter(
                ToolParameter::new("limit", "Maximum number of lines to read", false)
                    .with_type(ParamType::Integer),
            ),
        execute_read_file,
    )
}

pub fn write_file_tool() -> Tool {
    Tool::new(
        ToolDefinition::new(
            WRITE_FILE,
            "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does.",
        )
        .dangerous()
        .with_parameter(
            ToolParameter::new("path", "Path to the file to write", true).with_type(ParamType::Path),
        )
        .with_parameter(ToolParameter::new("content", "Content to write to the file", true))
        .with_parameter(
            ToolParameter::new("create_dirs", "Create parent directories if they don't exist", false)
                .with_type(ParamType::Boolean)
                .with_default(false),
        ),
        execute_write_file,
    )
}

pub fn edit_file_tool() -> Tool {
    Tool::new(
        ToolDefinition::new(
            EDIT_FILE,
            "Replace text in an existing file. old_text must match exactly once unless replace_all is set.",
        )
        .dangerous()
        .with_parameter(
            ToolParameter::new("path", "Path to the file to edit", true).with_type(ParamType::Path),
        )
        .with_parameter(ToolParameter::new("old_text", "Exact text to replace", true))
        .with_parameter(ToolParameter::new("new_text", "Replacement text", true))
        .with_parameter(
            ToolParameter::new("replace_all", "Replace every occurrence", false)
                .with_type(ParamType::Boolean)
                .with_default(false),
        ),
        execute_edit_file,
    )
}

fn string_arg<'a>(arguments: &'a ToolArguments, key: &str) -> Result<&'a str, String> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("'{}' must be a string", key))
}

fn bool_arg(arguments: &ToolArguments, key: &str) -> bool {
    arguments.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn execute_read_file(arguments: &ToolArguments) -> Result<String, String> {
    let path_str = string_arg(arguments, "path")?;
    let path = Path::new(path_str);

    if !path.exists() {
        return Err(format!("File not found: {}", path_str));
    }
    if !path.is_file() {
        return Err(format!("'{}' is not a file", path_str));
    }

    let metadata = fs::metadata(path).map_err(|e| format!("Failed to get file metadata: {}", e))?;
    if metadata.len() > MAX_READ_SIZE {
        return Err(format!(
            "File too large ({} bytes). Maximum size is {} bytes",
            metadata.len(),
            MAX_READ_SIZE
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    let offset = arguments.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
    let limit = arguments.get("limit").and_then(Value::as_u64).map(|l| l as usize);
    if offset == 0 && limit.is_none() {
        return Ok(content);
    }

    let lines: Vec<&str> = content.lines().collect();
    if offset >= lines.len() {
        return Ok(String::new());
    }
    let end = limit.map_or(lines.len(), |l| (offset + l).min(lines.len()));
    Ok(lines[offset..end].join("\n"))
}

fn execute_write_file(arguments: &ToolArguments) -> Result<String, String> {
    let path_str = string_arg(arguments, "path")?;
    let content = string_arg(arguments, "content")?;
    let path = Path::new(path_str);

    let _guard = WRITE_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
        && !parent.exists()
    {
        if bool_arg(arguments, "create_dirs") {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create parent directories: {}", e))?;
        } else {
            return Err(format!(
                "Parent directory does not exist: {}",
                parent.display()
            ));
        }
    }

    fs::write(path, content).map_err(|e| format!("Failed to write file: {}", e))?;
    Ok(format!("Wrote {} bytes to {}", content.len(), path_str))
}

fn execute_edit_file(arguments: &ToolArguments) -> Result<String, String> {
    let path_str = string_arg(arguments, "path")?;
    let old_text = string_arg(arguments, "old_text")?;
    let new_text = string_arg(arguments, "new_text")?;
    let replace_all = bool_arg(arguments, "replace_all");

    if old_text.is_empty() {
        return Err("old_text cannot be empty".to_string());
    }

    let _guard = WRITE_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    let content =
        fs::read_to_string(path_str).map_err(|e| format!("Failed to read {}: {}", path_str, e))?;
    let occurrences = content.matches(old_text).count();

    let updated = match occurrences {
        0 => return Err(format!("old_text not found in {}", path_str)),
        1 => content.replacen(old_text, new_text, 1),
        _ if replace_all => content.replace(old_text, new_text),
        n => {
            return Err(format!(
                "old_text matches {} times in {}; set replace_all or give more context",
                n, path_str
            ));
        }
    };

    fs::write(path_str, updated).map_err(|e| format!("Failed to write file: {}", e))?;
    Ok(format!(
        "Replaced {} occurrence(s) in {}",
        if replace_all { occurrences } else { 1 },
        path_str
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn args(pairs: &[(&str, Value)]) -> ToolArguments {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_definitions() {
        let tools = file_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec![READ_FILE, WRITE_FILE, EDIT_FILE]);
        assert!(!tools[0].definition().dangerous);
        assert!(tools[1].definition().dangerous);
        assert!(tools[2].definition().dangerous);
    }

    #[test]
    fn test_write_then_read_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/notes.txt");
        let path_str = path.to_str().unwrap();

        let missing_parent = execute_write_file(&args(&[
            ("path", json!(path_str)),
            ("content", json!("a")),
        ]));
        assert!(missing_parent.unwrap_err().contains("Parent directory"));

        execute_write_file(&args(&[
            ("path", json!(path_str)),
            ("content", json!("one\ntwo\nthree")),
            ("create_dirs", json!(true)),
        ]))
        .unwrap();

        let all = execute_read_file(&args(&[("path", json!(path_str))])).unwrap();
        assert_eq!(all, "one\ntwo\nthree");

        let slice = execute_read_file(&args(&[
            ("path", json!(path_str)),
            ("offset", json!(1)),
            ("limit", json!(1)),
        ]))
        .unwrap();
        assert_eq!(slice, "two");
    }

    #[test]
    fn test_read_missing_file() {
        let err = execute_read_file(&args(&[("path", json!("/definitely/not/here.txt"))]));
        assert!(err.unwrap_err().contains("File not found"));
    }

    #[test]
    fn test_edit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "let x = 1;\nlet y = 1;\n").unwrap();
        let path_str = path.to_str().unwrap();

        let ambiguous = execute_edit_file(&args(&[
            ("path", json!(path_str)),
            ("old_text", json!("= 1")),
            ("new_text", json!("= 2")),
        ]));
        assert!(ambiguous.unwrap_err().contains("matches 2 times"));

        execute_edit_file(&args(&[
            ("path", json!(path_str)),
            ("old_text", json!("let x = 1")),
            ("new_text", json!("let x = 10")),
        ]))
        .unwrap();

        let all = execute_edit_file(&args(&[
            ("path", json!(path_str)),
            ("old_text", json!("let")),
            ("new_text", json!("const")),
            ("replace_all", json!(true)),
        ]))
        .unwrap();
        assert!(all.starts_with("Replaced 2"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "const x = 10;\nconst y = 1;\n"
        );

        let absent = execute_edit_file(&args(&[
            ("path", json!(path_str)),
            ("old_text", json!("nothing like this")),
            ("new_text", json!("x")),
        ]));
        assert!(absent.unwrap_err().contains("not found"));
    }

    #[test]
    fn test_concurrent_writes_do_not_interleave() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.txt");
        let path_str = path.to_str().unwrap().to_string();
        let payloads: Vec<String> = (0..8).map(|i| i.to_string().repeat(4096)).collect();

        std::thread::scope(|scope| {
            for payload in &payloads {
                let path_str = path_str.clone();
                scope.spawn(move || {
                    execute_write_file(&args(&[
                        ("path", json!(path_str)),
                        ("content", json!(payload)),
                    ]))
                    .unwrap();
                });
            }
        });

        let content = fs::read_to_string(&path).unwrap();
        assert!(payloads.contains(&content));
    }
}
