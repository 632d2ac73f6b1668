//! External process model caller.
//!
//! Spawns the configured command once per model call, writes the
//! [`ModelRequest`] as JSON to its stdin and reads a [`ModelDecision`] as
//! JSON from its stdout. Any program that speaks this contract can act as
//! the model: a wrapper around a provider SDK, a local inference server
//! client, or a shell script.

use agency_application::ports::model_caller::{ModelCallError, ModelCaller, ModelRequest};
use agency_domain::ModelDecision;
use agency_domain::core::string::truncate;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Upper bound on stderr echoed into error messages
const STDERR_PREVIEW: usize = 400;

pub struct ProcessModelCaller {
    command: String,
    args: Vec<String>,
}

impl ProcessModelCaller {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl ModelCaller for ProcessModelCaller {
    async fn call(&self, request: &ModelRequest) -> Result<ModelDecision, ModelCallError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| ModelCallError::Rejected(format!("request not serializable: {}", e)))?;

        debug!(command = %self.command, agent = %request.agent, bytes = payload.len(), "Spawning model process");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ModelCallError::Transport(format!("failed to spawn '{}': {}", self.command, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| ModelCallError::Transport(format!("failed to write request: {}", e)))?;
            // Dropping stdin closes the pipe so the process sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ModelCallError::Transport(format!("failed to read response: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ModelCallError::Transport(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                truncate(stderr.trim(), STDERR_PREVIEW)
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            let stdout = String::from_utf8_lossy(&output.stdout);
            ModelCallError::InvalidResponse(format!(
                "{} (output: {})",
                e,
                truncate(stdout.trim(), STDERR_PREVIEW)
            ))
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use agency_domain::ReasoningEffort;

    fn request() -> ModelRequest {
        ModelRequest {
            agent: "planner".into(),
            model: "external".into(),
            reasoning_effort: ReasoningEffort::Low,
            system_prompt: "be brief".into(),
            history: Vec::new(),
            tools: Vec::new(),
            reminders: Vec::new(),
        }
    }

    fn shell(script: &str) -> ProcessModelCaller {
        ProcessModelCaller::new("sh").with_args(["-c", script])
    }

    #[tokio::test]
    async fn test_decision_from_stdout() {
        let caller = shell(r#"cat > /dev/null; echo '{"type":"final_answer","content":"hi"}'"#);
        let decision = caller.call(&request()).await.unwrap();
        assert_eq!(decision, ModelDecision::final_answer("hi"));
    }

    #[tokio::test]
    async fn test_request_is_written_to_stdin() {
        // Echo the agent name back as the answer
        let caller = shell(
            r#"agent=$(sed -n 's/.*"agent":"\([^"]*\)".*/\1/p'); printf '{"type":"final_answer","content":"%s"}' "$agent""#,
        );
        let decision = caller.call(&request()).await.unwrap();
        assert_eq!(decision.content(), "planner");
    }

    #[tokio::test]
    async fn test_failures_map_to_error_kinds() {
        let missing = ProcessModelCaller::new("definitely-not-a-real-model-binary");
        let err = missing.call(&request()).await.unwrap_err();
        assert!(matches!(err, ModelCallError::Transport(_)));
        assert!(err.is_transient());

        let garbage = shell("cat > /dev/null; echo not json");
        let err = garbage.call(&request()).await.unwrap_err();
        assert!(matches!(err, ModelCallError::InvalidResponse(_)));

        let crashed = shell("cat > /dev/null; echo oops >&2; exit 3");
        match crashed.call(&request()).await.unwrap_err() {
            ModelCallError::Transport(message) => assert!(message.contains("oops")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
