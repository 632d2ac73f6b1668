//! Built-in [`AgentHooks`] implementations and the dispatch helper the turn
//! loop uses to fire them.

pub mod composite;
pub mod system_reminder;
pub mod tracing_hooks;

pub use composite::CompositeHooks;
pub use system_reminder::SystemReminderHook;
pub use tracing_hooks::TracingHooks;

use crate::ports::agent_hooks::{AgentHooks, HookResult};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::warn;

/// Invoke one hook callback, logging and discarding failures and panics.
pub(crate) fn dispatch<F>(hook: &dyn AgentHooks, event: &'static str, mut f: F)
where
    F: FnMut(&dyn AgentHooks) -> HookResult,
{
    match catch_unwind(AssertUnwindSafe(|| f(hook))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(event, error = %e, "Hook failed; ignoring"),
        Err(_) => warn!(event, "Hook panicked; ignoring"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_hooks::HookError;

    struct Failing;

    impl AgentHooks for Failing {
        fn on_start(&self, _agent: &str, _input: &str) -> HookResult {
            Err(HookError::new("boom"))
        }

        fn on_end(&self, _agent: &str, _output: &str) -> HookResult {
            panic!("hook panic")
        }
    }

    #[test]
    fn test_dispatch_swallows_errors_and_panics() {
        let hook = Failing;
        dispatch(&hook, "on_start", |h| h.on_start("a", "in"));
        dispatch(&hook, "on_end", |h| h.on_end("a", "out"));
    }
}
