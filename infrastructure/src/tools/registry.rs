//! Tool Registry
//!
//! The [`ToolRegistry`] owns the tools an agency can call and implements
//! [`ToolExecutorPort`]. Every call goes through the same pipeline:
//!
//! ```text
//! lookup ──▶ validate ──▶ rate limit ──▶ confirm (dangerous only) ──▶ handler
//!   │            │             │                  │                      │
//!   ▼            ▼             ▼                  ▼                      ▼
//! Err(NotFound) Err(Invalid)  Ok(RateLimited)   Ok(DangerousRejected)   Ok(output | ExecutionFailed)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use agency_infrastructure::tools::{ToolRegistry, builtin_tools};
//!
//! let mut registry = ToolRegistry::new();
//! for tool in builtin_tools() {
//!     registry.register(tool)?;
//! }
//!
//! let call = ToolCall::new("calculator").with_arg("expression", "2+2");
//! let result = registry.execute(&call).await?;
//! assert_eq!(result.output(), Some("4"));
//! ```

use super::rate_limit::{RateLimit, RateLimiter};
use agency_application::ports::confirmation::{
    AutoRejectConfirmation, ConfirmationDecision, ConfirmationPort,
};
use agency_application::ports::tool_executor::ToolExecutorPort;
use agency_domain::{
    DefaultToolValidator, DomainError, ToolArguments, ToolCall, ToolDefinition, ToolError,
    ToolResult, ToolSpec, ToolValidator, tool_schema,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, warn};

/// Implementation of a tool. Receives validated, normalized arguments.
pub trait ToolHandler: Send + Sync {
    fn call(&self, arguments: &ToolArguments) -> Result<String, String>;
}

impl<F> ToolHandler for F
where
    F: Fn(&ToolArguments) -> Result<String, String> + Send + Sync,
{
    fn call(&self, arguments: &ToolArguments) -> Result<String, String> {
        self(arguments)
    }
}

/// A tool definition bound to its handler
#[derive(Clone)]
pub struct Tool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

impl Tool {
    pub fn new(definition: ToolDefinition, handler: impl ToolHandler + 'static) -> Self {
        Self {
            definition,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Tool counts, for `--show-config` and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub dangerous: usize,
    pub rate_limited: usize,
}

/// Name-keyed collection of tools with validation, rate limiting and
/// confirmation of dangerous tools.
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
    spec: ToolSpec,
    /// Schema cache, kept in step with `tools`
    schemas: HashMap<String, serde_json::Value>,
    validator: DefaultToolValidator,
    confirmation: Arc<dyn ConfirmationPort>,
    /// Tools approved with "always" in this registry instance
    approved: Mutex<HashSet<String>>,
    rate_limiter: RateLimiter,
}

impl ToolRegistry {
    /// Empty registry that rejects every dangerous call until a
    /// confirmation port is installed.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            spec: ToolSpec::new(),
            schemas: HashMap::new(),
            validator: DefaultToolValidator,
            confirmation: Arc::new(AutoRejectConfirmation),
            approved: Mutex::new(HashSet::new()),
            rate_limiter: RateLimiter::new(),
        }
    }

    pub fn with_confirmation(mut self, confirmation: Arc<dyn ConfirmationPort>) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_rate_limit(mut self, tool: impl Into<String>, limit: RateLimit) -> Self {
        self.set_rate_limit(tool, limit);
        self
    }

    pub fn set_rate_limit(&mut self, tool: impl Into<String>, limit: RateLimit) {
        self.rate_limiter.set_limit(tool, limit);
    }

    /// Add a tool. A name already in use is refused and the existing tool
    /// stays as it was.
    pub fn register(&mut self, tool: Tool) -> Result<(), DomainError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(DomainError::DuplicateTool(name));
        }

        self.schemas
            .insert(name.clone(), tool_schema(tool.definition()));
        self.spec.insert(tool.definition().clone());
        debug!(tool = %name, dangerous = tool.definition().dangerous, "Tool registered");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Register every tool, stopping at the first duplicate
    pub fn register_all(&mut self, tools: impl IntoIterator<Item = Tool>) -> Result<(), DomainError> {
        tools.into_iter().try_for_each(|tool| self.register(tool))
    }

    /// Remove a tool. Returns whether it was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.schemas.remove(name);
        self.spec.remove(name);
        self.rate_limiter.remove_limit(name);
        self.approved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
        self.tools.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Cached schemas of every tool, sorted by name
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.spec
            .names()
            .filter_map(|name| self.schemas.get(name).cloned())
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total: self.tools.len(),
            dangerous: self.spec.dangerous_tools().count(),
            rate_limited: self.rate_limiter.limited_tools(),
        }
    }

    /// Independent registry with the same tools.
    ///
    /// Handlers are shared. Rate-limit windows and remembered approvals are
    /// copied, so the fork and the original diverge from here on.
    pub fn fork(&self) -> Self {
        Self {
            tools: self.tools.clone(),
            spec: self.spec.clone(),
            schemas: self.schemas.clone(),
            validator: self.validator.clone(),
            confirmation: Arc::clone(&self.confirmation),
            approved: Mutex::new(self.approved.lock().unwrap_or_else(|e| e.into_inner()).clone()),
            rate_limiter: self.rate_limiter.clone(),
        }
    }

    /// Ask the confirmation port on the blocking pool; console prompts
    /// read stdin.
    async fn confirm(&self, definition: &ToolDefinition, call: &ToolCall) -> Result<(), String> {
        let name = &definition.name;
        if self
            .approved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(name)
        {
            return Ok(());
        }

        let port = Arc::clone(&self.confirmation);
        let (definition, call) = (definition.clone(), call.clone());
        let decision = tokio::task::spawn_blocking(move || port.confirm(&definition, &call))
            .await
            .unwrap_or_else(|e| ConfirmationDecision::Reject(format!("confirmation failed: {}", e)));

        match decision {
            ConfirmationDecision::Approve => Ok(()),
            ConfirmationDecision::ApproveAlways => {
                self.approved
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(name.clone());
                Ok(())
            }
            ConfirmationDecision::Reject(reason) => Err(reason),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ToolRegistry {
    fn clone(&self) -> Self {
        self.fork()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn schema(&self, name: &str) -> Option<serde_json::Value> {
        self.schemas.get(name).cloned()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let name = call.tool_name.as_str();
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        let arguments = self
            .validator
            .validate(call, tool.definition())
            .map_err(ToolError::invalid_argument)?;

        if let Err(limit) = self.rate_limiter.try_acquire(name) {
            warn!(tool = name, max_calls = limit.max_calls, "Tool call rate limited");
            return Ok(ToolResult::failure(
                name,
                ToolError::rate_limited(name, limit.max_calls, limit.window.as_secs_f64()),
            ));
        }

        if tool.definition().dangerous
            && let Err(reason) = self.confirm(tool.definition(), call).await
        {
            warn!(tool = name, reason = %reason, "Dangerous tool call rejected");
            return Ok(ToolResult::failure(
                name,
                ToolError::dangerous_rejected(name, &reason),
            ));
        }

        let started = Instant::now();
        let handler = Arc::clone(&tool.handler);
        let outcome = tokio::task::spawn_blocking(move || handler.call(&arguments)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(Ok(output)) => ToolResult::success(name, output),
            Ok(Err(message)) => ToolResult::failure(name, ToolError::execution_failed(message)),
            Err(join_error) => {
                warn!(tool = name, error = %join_error, "Tool handler panicked");
                ToolResult::failure(
                    name,
                    ToolError::execution_failed(format!("Tool '{}' crashed", name)),
                )
            }
        };
        debug!(tool = name, success = result.is_success(), duration_ms, "Tool call finished");
        Ok(result.with_duration(duration_ms))
    }

    fn isolate(&self) -> Arc<dyn ToolExecutorPort> {
        Arc::new(self.fork())
    }
}
