//! Tool domain traits
//!
//! Pure validation of tool calls against their parameter contract.
//! Execution lives behind the application layer's `ToolExecutorPort`.

use super::entities::{ParamType, ToolArguments, ToolCall, ToolDefinition};
use serde_json::Value;

/// Validator for tool calls
///
/// Checks a call against its definition and returns the normalized argument
/// map the handler receives: defaults filled in and values coerced to the
/// declared types.
pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition)
    -> Result<ToolArguments, String>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<ToolArguments, String> {
        // Reject arguments the contract does not declare
        for arg_name in call.arguments.keys() {
            if definition.parameter(arg_name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        let mut normalized = ToolArguments::with_capacity(definition.parameters.len());
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                // Explicit null is treated as absent
                Some(Value::Null) | None => {
                    if param.required {
                        return Err(format!(
                            "Missing required parameter '{}' for tool '{}'",
                            param.name, definition.name
                        ));
                    }
                    if let Some(default) = &param.default {
                        normalized.insert(param.name.clone(), default.clone());
                    }
                }
                Some(value) => {
                    let coerced = coerce(value, &param.param_type).map_err(|expected| {
                        format!(
                            "Parameter '{}' for tool '{}' expects {}, got {}",
                            param.name, definition.name, expected, value
                        )
                    })?;
                    normalized.insert(param.name.clone(), coerced);
                }
            }
        }

        Ok(normalized)
    }
}

/// Coerce a JSON value to the declared semantic type.
///
/// Models routinely send `"3"` for numbers and `"true"` for booleans, so
/// string forms are accepted where the conversion is unambiguous.
fn coerce(value: &Value, param_type: &ParamType) -> Result<Value, String> {
    match param_type {
        ParamType::String | ParamType::Path => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err("a string".to_string()),
        },
        ParamType::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "a number".to_string()),
            _ => Err("a number".to_string()),
        },
        ParamType::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::Number(n) => match n.as_f64() {
                // Whole floats outside the i64 range would saturate
                Some(f) if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) => {
                    Ok(Value::from(f as i64))
                }
                _ => Err("an integer".to_string()),
            },
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| "an integer".to_string()),
            _ => Err("an integer".to_string()),
        },
        ParamType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "0" => Ok(Value::Bool(false)),
                _ => Err("a boolean".to_string()),
            },
            _ => Err("a boolean".to_string()),
        },
        ParamType::Array => match value {
            Value::Array(_) => Ok(value.clone()),
            _ => Err("an array".to_string()),
        },
        ParamType::Object => match value {
            Value::Object(_) => Ok(value.clone()),
            _ => Err("an object".to_string()),
        },
        ParamType::Enum(choices) => match value.as_str() {
            Some(s) if choices.iter().any(|c| c == s) => Ok(value.clone()),
            _ => Err(format!("one of [{}]", choices.join(", "))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;
    use serde_json::json;

    fn text_tool() -> ToolDefinition {
        ToolDefinition::new("shout", "Echo text")
            .with_parameter(ToolParameter::new("text", "Text to echo", true))
            .with_parameter(
                ToolParameter::new("uppercase", "Uppercase output", false)
                    .with_type(ParamType::Boolean)
                    .with_default(false),
            )
    }

    #[test]
    fn test_validator_missing_required() {
        let result = DefaultToolValidator.validate(&ToolCall::new("shout"), &text_tool());
        assert!(result.unwrap_err().contains("Missing required parameter 'text'"));
    }

    #[test]
    fn test_validator_null_counts_as_missing() {
        let call = ToolCall::new("shout").with_arg("text", Value::Null);
        assert!(DefaultToolValidator.validate(&call, &text_tool()).is_err());
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("shout")
            .with_arg("text", "hi")
            .with_arg("volume", 11);
        let result = DefaultToolValidator.validate(&call, &text_tool());
        assert!(result.unwrap_err().contains("Unknown parameter 'volume'"));
    }

    #[test]
    fn test_validator_fills_defaults() {
        let call = ToolCall::new("shout").with_arg("text", "hi");
        let args = DefaultToolValidator.validate(&call, &text_tool()).unwrap();
        assert_eq!(args["text"], json!("hi"));
        assert_eq!(args["uppercase"], json!(false));
    }

    #[test]
    fn test_validator_coerces_string_forms() {
        let call = ToolCall::new("shout")
            .with_arg("text", "hi")
            .with_arg("uppercase", "true");
        let args = DefaultToolValidator.validate(&call, &text_tool()).unwrap();
        assert_eq!(args["uppercase"], json!(true));
    }

    #[test]
    fn test_validator_rejects_uncoercible_value() {
        let call = ToolCall::new("shout")
            .with_arg("text", "hi")
            .with_arg("uppercase", "loudly");
        let err = DefaultToolValidator
            .validate(&call, &text_tool())
            .unwrap_err();
        assert!(err.contains("expects a boolean"));
    }

    #[test]
    fn test_validator_numbers() {
        let tool = ToolDefinition::new("count", "Count")
            .with_parameter(
                ToolParameter::new("n", "How many", true).with_type(ParamType::Integer),
            )
            .with_parameter(
                ToolParameter::new("ratio", "Scale", false).with_type(ParamType::Number),
            );

        let call = ToolCall::new("count").with_arg("n", "42").with_arg("ratio", "0.5");
        let args = DefaultToolValidator.validate(&call, &tool).unwrap();
        assert_eq!(args["n"], json!(42));
        assert_eq!(args["ratio"], json!(0.5));

        let call = ToolCall::new("count").with_arg("n", 2.5);
        assert!(DefaultToolValidator.validate(&call, &tool).is_err());
    }

    #[test]
    fn test_validator_rejects_integers_out_of_range() {
        let tool = ToolDefinition::new("count", "Count").with_parameter(
            ToolParameter::new("n", "How many", true).with_type(ParamType::Integer),
        );

        for huge in [1e300, -1e300, 9.3e18] {
            let call = ToolCall::new("count").with_arg("n", huge);
            let err = DefaultToolValidator.validate(&call, &tool).unwrap_err();
            assert!(err.contains("expects an integer"), "{huge}: {err}");
        }

        let call = ToolCall::new("count").with_arg("n", 3.0);
        let args = DefaultToolValidator.validate(&call, &tool).unwrap();
        assert_eq!(args["n"], json!(3));
    }

    #[test]
    fn test_validator_enum_choices() {
        let tool = ToolDefinition::new("mode", "Mode").with_parameter(
            ToolParameter::new("speed", "Speed", true).with_choices(["fast", "slow"]),
        );

        let ok = ToolCall::new("mode").with_arg("speed", "fast");
        assert!(DefaultToolValidator.validate(&ok, &tool).is_ok());

        let bad = ToolCall::new("mode").with_arg("speed", "warp");
        let err = DefaultToolValidator.validate(&bad, &tool).unwrap_err();
        assert!(err.contains("one of [fast, slow]"));
    }
}
