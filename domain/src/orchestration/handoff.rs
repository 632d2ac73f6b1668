//! Handoff protocol types: the delegation tool, requests and results.

use super::graph::HandoffKind;
use crate::tool::entities::{ParamType, ToolCall, ToolDefinition, ToolParameter};
use crate::tool::value_objects::FAILURE_PREFIX;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the delegation tool offered to agents with outgoing edges
pub const HANDOFF_TOOL: &str = "handoff";

/// Definition of the delegation tool for an agent.
///
/// `targets` becomes the explicit value list of `toAgent` so the model can
/// only name agents the graph lets this agent reach.
pub fn handoff_tool_definition(targets: &[&str], kinds: &[HandoffKind]) -> ToolDefinition {
    let mut definition = ToolDefinition::new(
        HANDOFF_TOOL,
        "Delegate a task to another agent and receive its answer. \
         Several handoffs in one response may run in parallel.",
    )
    .with_parameter(
        ToolParameter::new("toAgent", "Name of the agent to delegate to", true)
            .with_choices(targets.iter().copied()),
    )
    .with_parameter(ToolParameter::new(
        "message",
        "Task or question for the target agent",
        true,
    ))
    .with_parameter(
        ToolParameter::new(
            "contextData",
            "Structured data the target agent should see",
            false,
        )
        .with_type(ParamType::Object),
    );

    if kinds.len() > 1 || kinds.first().is_some_and(|k| *k != HandoffKind::SendMessage) {
        definition = definition.with_parameter(
            ToolParameter::new("kind", "How to hand off", false)
                .with_choices(kinds.iter().map(|k| k.as_str()))
                .with_default(default_handoff_kind(kinds).as_str()),
        );
    }

    definition
}

/// Kind used when a handoff call omits `kind`.
///
/// `send_message` when the agent may use it, otherwise the first kind its
/// edges allow, so the default is always one of the offered choices.
pub fn default_handoff_kind(kinds: &[HandoffKind]) -> HandoffKind {
    if kinds.is_empty() || kinds.contains(&HandoffKind::SendMessage) {
        HandoffKind::SendMessage
    } else {
        kinds[0]
    }
}

/// A request to delegate work to another agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffRequest {
    pub to_agent: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_data: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub kind: HandoffKind,
}

impl HandoffRequest {
    pub fn new(to_agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to_agent: to_agent.into(),
            message: message.into(),
            context_data: None,
            kind: HandoffKind::SendMessage,
        }
    }

    pub fn with_kind(mut self, kind: HandoffKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_context(mut self, data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.context_data = Some(data);
        self
    }

    /// Build a request from an invocation of the [`HANDOFF_TOOL`].
    ///
    /// `default_kind` applies when the call omits `kind`; pass the
    /// [`default_handoff_kind`] of the calling agent.
    pub fn from_call(call: &ToolCall, default_kind: HandoffKind) -> Result<Self, HandoffError> {
        let to_agent = call
            .require_string("toAgent")
            .map_err(HandoffError::InvalidRequest)?;
        let message = call
            .require_string("message")
            .map_err(HandoffError::InvalidRequest)?;

        let context_data = match call.arguments.get("contextData") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Object(map)) => Some(map.clone()),
            Some(other) => {
                return Err(HandoffError::InvalidRequest(format!(
                    "contextData must be an object, got {}",
                    other
                )));
            }
        };

        let kind = match call.get_string("kind") {
            None => default_kind,
            Some(s) => s.parse().map_err(HandoffError::InvalidRequest)?,
        };

        Ok(Self {
            to_agent: to_agent.to_string(),
            message: message.to_string(),
            context_data,
            kind,
        })
    }
}

/// Why a handoff did not produce an answer
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum HandoffError {
    #[error("no such edge: {from} -> {to} ({kind})")]
    EdgeInvalid {
        from: String,
        to: String,
        kind: HandoffKind,
    },

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("invalid handoff request: {0}")]
    InvalidRequest(String),

    #[error("handoff depth limit of {max} reached")]
    DepthExceeded { max: usize },

    #[error("timeout")]
    BranchTimeout,

    #[error("agent failed: {0}")]
    AgentFailed(String),

    #[error("cancelled")]
    Cancelled,
}

impl HandoffError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HandoffError::BranchTimeout)
    }
}

/// Outcome of one handoff, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffResult {
    pub success: bool,
    /// Answer of the target agent (or its best partial answer on failure)
    pub response: String,
    pub from_agent: String,
    pub to_agent: String,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<HandoffError>,
}

impl HandoffResult {
    pub fn success(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        response: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: true,
            response: response.into(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            duration_ms,
            error: None,
        }
    }

    pub fn failure(
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        error: HandoffError,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: false,
            response: String::new(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            duration_ms,
            error: Some(error),
        }
    }

    /// Attach the partial answer a failed target produced
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Render as the tool result string merged into the caller's history
    pub fn to_message(&self) -> String {
        match &self.error {
            None => self.response.clone(),
            Some(error) if self.response.is_empty() => format!(
                "{}handoff to '{}' failed: {}",
                FAILURE_PREFIX, self.to_agent, error
            ),
            Some(error) => format!(
                "{}handoff to '{}' failed: {}\nPartial response:\n{}",
                FAILURE_PREFIX, self.to_agent, error, self.response
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::schema::tool_schema;
    use serde_json::json;

    #[test]
    fn test_handoff_tool_schema() {
        let def = handoff_tool_definition(&["coder", "reviewer"], &[HandoffKind::SendMessage]);
        let schema = tool_schema(&def);

        assert_eq!(schema["name"], HANDOFF_TOOL);
        assert_eq!(schema["parameters"]["required"], json!(["toAgent", "message"]));
        assert_eq!(
            schema["parameters"]["properties"]["toAgent"]["enum"],
            json!(["coder", "reviewer"])
        );
        assert_eq!(schema["parameters"]["properties"]["contextData"]["type"], "object");
        // A single send_message kind needs no selector
        assert!(schema["parameters"]["properties"].get("kind").is_none());
    }

    #[test]
    fn test_handoff_tool_offers_kind_when_transfer_allowed() {
        let def = handoff_tool_definition(
            &["coder"],
            &[HandoffKind::SendMessage, HandoffKind::Transfer],
        );
        let kind = def.parameter("kind").unwrap();
        assert!(!kind.required);
        assert_eq!(
            kind.param_type.choices().unwrap(),
            &["send_message".to_string(), "transfer".to_string()]
        );
    }

    #[test]
    fn test_request_from_call() {
        let call = ToolCall::new(HANDOFF_TOOL)
            .with_arg("toAgent", "coder")
            .with_arg("message", "implement it")
            .with_arg("contextData", json!({"file": "main.rs"}))
            .with_arg("kind", "transfer");

        let request = HandoffRequest::from_call(&call, HandoffKind::SendMessage).unwrap();
        assert_eq!(request.to_agent, "coder");
        assert_eq!(request.message, "implement it");
        assert_eq!(request.kind, HandoffKind::Transfer);
        assert_eq!(request.context_data.unwrap()["file"], json!("main.rs"));
    }

    #[test]
    fn test_request_from_call_rejects_bad_input() {
        let missing = ToolCall::new(HANDOFF_TOOL).with_arg("toAgent", "coder");
        assert!(matches!(
            HandoffRequest::from_call(&missing, HandoffKind::SendMessage),
            Err(HandoffError::InvalidRequest(_))
        ));

        let bad_context = ToolCall::new(HANDOFF_TOOL)
            .with_arg("toAgent", "coder")
            .with_arg("message", "hi")
            .with_arg("contextData", "not an object");
        assert!(HandoffRequest::from_call(&bad_context, HandoffKind::SendMessage).is_err());
    }

    #[test]
    fn test_transfer_only_agent_defaults_to_transfer() {
        let kinds = [HandoffKind::Transfer];
        assert_eq!(default_handoff_kind(&kinds), HandoffKind::Transfer);
        assert_eq!(
            default_handoff_kind(&[HandoffKind::SendMessage, HandoffKind::Transfer]),
            HandoffKind::SendMessage
        );

        let def = handoff_tool_definition(&["coder"], &kinds);
        let kind = def.parameter("kind").unwrap();
        assert_eq!(kind.default, Some(json!("transfer")));
        assert_eq!(kind.param_type.choices().unwrap(), &["transfer".to_string()]);

        let call = ToolCall::new(HANDOFF_TOOL)
            .with_arg("toAgent", "coder")
            .with_arg("message", "take over");
        let request = HandoffRequest::from_call(&call, default_handoff_kind(&kinds)).unwrap();
        assert_eq!(request.kind, HandoffKind::Transfer);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(HandoffError::BranchTimeout.to_string(), "timeout");
        assert!(HandoffError::BranchTimeout.is_timeout());
        let edge = HandoffError::EdgeInvalid {
            from: "a".into(),
            to: "b".into(),
            kind: HandoffKind::SendMessage,
        };
        assert!(edge.to_string().starts_with("no such edge"));
    }

    #[test]
    fn test_result_messages() {
        let ok = HandoffResult::success("planner", "coder", "done", 12);
        assert_eq!(ok.to_message(), "done");

        let failed = HandoffResult::failure("planner", "coder", HandoffError::BranchTimeout, 2000);
        assert_eq!(
            failed.to_message(),
            "Error: handoff to 'coder' failed: timeout"
        );

        let partial = HandoffResult::failure(
            "planner",
            "coder",
            HandoffError::AgentFailed("turn limit".into()),
            5,
        )
        .with_response("half done");
        assert!(partial.to_message().ends_with("half done"));
    }
}
