//! JSON Schema generation for tool definitions.
//!
//! Produces the wire contract handed to the model collaborator:
//!
//! ```text
//! {"name": ..., "description": ...,
//!  "parameters": {"type": "object", "properties": {...}, "required": [...]}}
//! ```
//!
//! Generation is a pure function of the [`ToolDefinition`]: `required` lists
//! only required parameters in contract order, optional parameters appear in
//! `properties` alone, and enum parameters carry their explicit value list.

use super::entities::{ParamType, ToolDefinition, ToolSpec};
use serde_json::{Map, Value, json};

/// Convert a single tool definition to its JSON Schema object.
pub fn tool_schema(tool: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &tool.parameters {
        let mut prop = Map::new();
        prop.insert("type".to_string(), json!(param.param_type.schema_type()));
        prop.insert("description".to_string(), json!(param.description));

        match &param.param_type {
            ParamType::Enum(choices) => {
                prop.insert("enum".to_string(), json!(choices));
            }
            ParamType::Array => {
                prop.insert("items".to_string(), json!({}));
            }
            _ => {}
        }

        if let Some(default) = &param.default {
            prop.insert("default".to_string(), default.clone());
        }

        properties.insert(param.name.clone(), Value::Object(prop));

        if param.required {
            required.push(json!(param.name));
        }
    }

    json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": {
            "type": "object",
            "properties": properties,
            "required": required,
        }
    })
}

/// Convert every tool in the spec, sorted by name.
pub fn tool_schemas(spec: &ToolSpec) -> Vec<Value> {
    spec.all().map(tool_schema).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    #[test]
    fn test_required_excludes_defaulted_parameters() {
        let tool = ToolDefinition::new("shout", "Echo text")
            .with_parameter(ToolParameter::new("text", "Text to echo", true))
            .with_parameter(
                ToolParameter::new("uppercase", "Uppercase output", false)
                    .with_type(ParamType::Boolean)
                    .with_default(false),
            );

        let schema = tool_schema(&tool);

        assert_eq!(schema["parameters"]["required"], json!(["text"]));
        let uppercase = &schema["parameters"]["properties"]["uppercase"];
        assert_eq!(uppercase["type"], "boolean");
        assert_eq!(uppercase["default"], false);
    }

    #[test]
    fn test_schema_shape() {
        let tool = ToolDefinition::new("read_file", "Read file contents")
            .with_parameter(
                ToolParameter::new("path", "File path to read", true).with_type(ParamType::Path),
            )
            .with_parameter(
                ToolParameter::new("limit", "Max lines", false).with_type(ParamType::Integer),
            );

        let schema = tool_schema(&tool);

        assert_eq!(schema["name"], "read_file");
        assert_eq!(schema["description"], "Read file contents");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(schema["parameters"]["properties"]["path"]["type"], "string");
        assert_eq!(
            schema["parameters"]["properties"]["path"]["description"],
            "File path to read"
        );
        assert_eq!(schema["parameters"]["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["parameters"]["required"], json!(["path"]));
    }

    #[test]
    fn test_enum_expands_values() {
        let tool = ToolDefinition::new("handoff", "Delegate").with_parameter(
            ToolParameter::new("toAgent", "Target", true).with_choices(["coder", "reviewer"]),
        );

        let prop = &tool_schema(&tool)["parameters"]["properties"]["toAgent"];
        assert_eq!(prop["type"], "string");
        assert_eq!(prop["enum"], json!(["coder", "reviewer"]));
    }

    #[test]
    fn test_schema_is_deterministic() {
        let tool = ToolDefinition::new("t", "d")
            .with_parameter(ToolParameter::new("b", "b", true))
            .with_parameter(ToolParameter::new("a", "a", false).with_type(ParamType::Array));

        let first = serde_json::to_string(&tool_schema(&tool)).unwrap();
        let second = serde_json::to_string(&tool_schema(&tool)).unwrap();
        assert_eq!(first, second);
        assert_eq!(tool_schema(&tool)["parameters"]["properties"]["a"]["items"], json!({}));
    }

    #[test]
    fn test_tool_schemas_sorted_by_name() {
        let mut spec = ToolSpec::new();
        spec.insert(ToolDefinition::new("write_file", "Write"));
        spec.insert(ToolDefinition::new("calculator", "Math"));

        let schemas = tool_schemas(&spec);
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0]["name"], "calculator");
        assert_eq!(schemas[1]["name"], "write_file");
    }
}
