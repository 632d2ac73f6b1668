//! Handoff protocol: edge checks, inline delegation and parallel branches.

use super::agent::Agent;
use super::context::ExecutionContext;
use super::types::{AgentOutput, AgentRunError};
use super::Agency;
use agency_domain::{HandoffError, HandoffRequest, HandoffResult};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One branch of a parallel handoff batch
enum Branch {
    /// Refused before anything started
    Refused(HandoffResult),
    Running {
        from: String,
        to: String,
        token: CancellationToken,
        handle: JoinHandle<HandoffResult>,
        started: Instant,
    },
}

impl Branch {
    async fn join(self, deadline: Instant) -> HandoffResult {
        let (from, to, token, handle, started) = match self {
            Branch::Refused(result) => return result,
            Branch::Running {
                from,
                to,
                token,
                handle,
                started,
            } => (from, to, token, handle, started),
        };

        match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => {
                warn!(from = %from, to = %to, error = %join_error, "Branch task failed");
                HandoffResult::failure(
                    from,
                    to,
                    HandoffError::AgentFailed(format!("branch task failed: {}", join_error)),
                    elapsed_ms(started),
                )
            }
            Err(_) => {
                // Abandon the branch: no further model or tool step starts,
                // an in-flight call finishes unobserved.
                token.cancel();
                warn!(from = %from, to = %to, "Branch timed out; abandoning");
                HandoffResult::failure(from, to, HandoffError::BranchTimeout, elapsed_ms(started))
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

impl Agency {
    /// Delegate `request` from agent `from`, running the target inline.
    ///
    /// Never fails: refusals and target failures are reported in the
    /// returned [`HandoffResult`]. The call stack depth is the same after
    /// the call as before it.
    pub async fn handoff(
        &self,
        ctx: &mut ExecutionContext,
        from: &str,
        request: HandoffRequest,
    ) -> HandoffResult {
        let started = Instant::now();
        let target = match self.admit(ctx, from, &request) {
            Ok(target) => target,
            Err(error) => return HandoffResult::failure(from, &request.to_agent, error, 0),
        };

        ctx.call_stack_mut().push(target.name());
        let mut nested = ctx.nested(request.context_data.as_ref());
        let outcome = self.run_agent(&target, &mut nested, &request.message).await;
        ctx.rejoin(nested);
        ctx.call_stack_mut().pop();

        handoff_result(from, &request.to_agent, outcome, started)
    }

    /// Delegate several requests at once, one tokio task per target.
    ///
    /// Every branch is bounded by `branch_timeout`, measured from the start
    /// of the batch. Results come back in request order, one per request.
    pub async fn handoff_parallel(
        &self,
        ctx: &ExecutionContext,
        from: &str,
        requests: Vec<HandoffRequest>,
    ) -> Vec<HandoffResult> {
        let timeout = self.config().branch_timeout;
        let deadline = Instant::now() + timeout;
        info!(
            from,
            branches = requests.len(),
            timeout_secs = timeout.as_secs_f64(),
            "Starting parallel handoffs"
        );

        let branches: Vec<Branch> = requests
            .into_iter()
            .map(|request| self.spawn_branch(ctx, from, request))
            .collect();

        futures::future::join_all(branches.into_iter().map(|b| b.join(deadline))).await
    }

    fn spawn_branch(&self, ctx: &ExecutionContext, from: &str, request: HandoffRequest) -> Branch {
        let started = Instant::now();
        let target = match self.admit(ctx, from, &request) {
            Ok(target) => target,
            Err(error) => {
                return Branch::Refused(HandoffResult::failure(from, &request.to_agent, error, 0));
            }
        };

        let token = ctx.cancellation().child_token();
        let mut branch_ctx = ctx.branch(request.context_data.as_ref(), token.clone());
        branch_ctx.call_stack_mut().push(target.name());

        let agency = self.clone();
        let caller = from.to_string();
        let to = request.to_agent.clone();
        let handle = tokio::spawn(async move {
            let outcome = agency
                .run_agent(&target, &mut branch_ctx, &request.message)
                .await;
            branch_ctx.call_stack_mut().pop();
            handoff_result(&caller, &request.to_agent, outcome, started)
        });

        Branch::Running {
            from: from.to_string(),
            to,
            token,
            handle,
            started,
        }
    }

    /// Check a handoff before anything runs and fire `on_handoff`.
    fn admit(
        &self,
        ctx: &ExecutionContext,
        from: &str,
        request: &HandoffRequest,
    ) -> Result<Arc<Agent>, HandoffError> {
        let to = request.to_agent.as_str();
        let refusal = if ctx.is_cancelled() {
            Some(HandoffError::Cancelled)
        } else if self.agent(to).is_none() {
            Some(HandoffError::UnknownAgent(to.to_string()))
        } else if !self.graph().allows(from, to, request.kind) {
            Some(HandoffError::EdgeInvalid {
                from: from.to_string(),
                to: to.to_string(),
                kind: request.kind,
            })
        } else if ctx.call_stack().depth() >= self.config().max_handoff_depth {
            Some(HandoffError::DepthExceeded {
                max: self.config().max_handoff_depth,
            })
        } else {
            None
        };

        if let Some(error) = refusal {
            warn!(from, to, error = %error, "Handoff refused");
            return Err(error);
        }

        let target = self
            .agent_arc(to)
            .ok_or_else(|| HandoffError::UnknownAgent(to.to_string()))?;
        info!(
            from,
            to,
            kind = %request.kind,
            depth = ctx.call_stack().depth() + 1,
            "Handoff"
        );
        self.fire(&target, "on_handoff", |h| h.on_handoff(from, to, request));
        Ok(target)
    }
}

fn handoff_result(
    from: &str,
    to: &str,
    outcome: Result<AgentOutput, AgentRunError>,
    started: Instant,
) -> HandoffResult {
    let duration_ms = elapsed_ms(started);
    match outcome {
        Ok(output) => HandoffResult::success(from, to, output.response, duration_ms),
        Err(error) => {
            warn!(from, to, error = %error, "Handoff target failed");
            let result = HandoffResult::failure(from, to, error.to_handoff_error(), duration_ms);
            match error.partial_response() {
                Some(partial) => result.with_response(partial),
                None => result,
            }
        }
    }
}
