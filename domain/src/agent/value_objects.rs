//! Agent domain value objects
//!
//! - [`Turn`] / [`TurnRole`] - one entry of an agent's conversation history
//! - [`ModelDecision`] - what the model collaborator decided to do next

use crate::tool::entities::ToolCall;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry of an agent's conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Tool that produced this turn (tool turns only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Correlation id of the tool call this turn answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_name: None,
            call_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Result of a tool invocation, correlated to the originating call
    pub fn tool(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_name: Some(call.tool_name.clone()),
            call_id: call.id.clone(),
            ..Self::new(TurnRole::Tool, content)
        }
    }

    pub fn is_tool(&self) -> bool {
        self.role == TurnRole::Tool
    }
}

/// Decision returned by the model collaborator for one model call.
///
/// Wire form:
///
/// ```json
/// {"type": "final_answer", "content": "done"}
/// {"type": "tool_calls", "content": "", "calls": [{"name": "calculator", "arguments": {"expression": "2+2"}}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelDecision {
    /// The agent is done; `content` is its answer
    FinalAnswer { content: String },
    /// The agent wants tools run before it continues
    ToolCalls {
        /// Text the model produced alongside the calls
        #[serde(default)]
        content: String,
        calls: Vec<ToolCall>,
    },
}

impl ModelDecision {
    pub fn final_answer(content: impl Into<String>) -> Self {
        ModelDecision::FinalAnswer {
            content: content.into(),
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        ModelDecision::ToolCalls {
            content: String::new(),
            calls,
        }
    }

    /// Text carried by the decision (may be empty)
    pub fn content(&self) -> &str {
        match self {
            ModelDecision::FinalAnswer { content } | ModelDecision::ToolCalls { content, .. } => {
                content
            }
        }
    }

    pub fn calls(&self) -> &[ToolCall] {
        match self {
            ModelDecision::FinalAnswer { .. } => &[],
            ModelDecision::ToolCalls { calls, .. } => calls,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ModelDecision::FinalAnswer { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_turn_keeps_correlation() {
        let call = ToolCall::new("calculator").with_id("call_7");
        let turn = Turn::tool(&call, "4");

        assert!(turn.is_tool());
        assert_eq!(turn.tool_name.as_deref(), Some("calculator"));
        assert_eq!(turn.call_id.as_deref(), Some("call_7"));
        assert_eq!(turn.content, "4");
    }

    #[test]
    fn test_decision_wire_form() {
        let decision: ModelDecision = serde_json::from_str(
            r#"{"type":"tool_calls","calls":[{"name":"calculator","arguments":{"expression":"2+2"}}]}"#,
        )
        .unwrap();

        assert!(!decision.is_final());
        assert_eq!(decision.content(), "");
        assert_eq!(decision.calls().len(), 1);
        assert_eq!(decision.calls()[0].get_string("expression"), Some("2+2"));

        let final_answer: ModelDecision =
            serde_json::from_str(r#"{"type":"final_answer","content":"4"}"#).unwrap();
        assert_eq!(final_answer, ModelDecision::final_answer("4"));
        assert!(final_answer.calls().is_empty());
    }
}
