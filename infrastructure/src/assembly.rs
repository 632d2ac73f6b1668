//! Wiring from file configuration to a runnable [`Agency`].

use crate::config::{FileConfig, FileModelConfig, FileToolsConfig};
use crate::model::{ProcessModelCaller, ScriptLoadError, ScriptedModelCaller};
use crate::tools::{RateLimit, ToolRegistry, default_registry};
use agency_application::use_cases::agency::roles::{CODER, PLANNER, REVIEWER};
use agency_application::{
    Agency, Agent, AgentHooks, ConfirmationPort, ModelCaller, SystemReminderHook,
    ToolExecutorPort, create_coder_agent, create_planner_agent, create_reviewer_agent,
};
use agency_domain::{DomainError, HandoffKind, ReasoningEffort};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("No model configured: set [model].command or [model].script (or pass --model-command / --script)")]
    NoModelSource,

    #[error(transparent)]
    Script(#[from] ScriptLoadError),

    #[error("Rate limit configured for unknown tool '{0}'")]
    UnknownRateLimitedTool(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Edges of the built-in agency
const DEFAULT_EDGES: [(&str, &str); 3] = [(PLANNER, CODER), (PLANNER, REVIEWER), (CODER, REVIEWER)];

/// Registry with the built-in tools, the given confirmation policy and
/// the configured rate limits.
pub fn build_registry(
    tools: &FileToolsConfig,
    confirmation: Arc<dyn ConfirmationPort>,
) -> Result<ToolRegistry, AssemblyError> {
    let mut registry = default_registry().with_confirmation(confirmation);

    let mut limited: Vec<_> = tools.rate_limits.iter().collect();
    limited.sort_by(|a, b| a.0.cmp(b.0));
    for (tool, limit) in limited {
        if !registry.has_tool(tool) {
            return Err(AssemblyError::UnknownRateLimitedTool(tool.clone()));
        }
        registry.set_rate_limit(
            tool.clone(),
            RateLimit::new(limit.max_calls, Duration::from_secs(limit.window_seconds)),
        );
    }

    let stats = registry.stats();
    debug!(
        tools = stats.total,
        dangerous = stats.dangerous,
        rate_limited = stats.rate_limited,
        "Tool registry ready"
    );
    Ok(registry)
}

/// Model caller for the configured decision source. A script wins over a
/// command.
pub fn build_model_caller(model: &FileModelConfig) -> Result<Arc<dyn ModelCaller>, AssemblyError> {
    if let Some(script) = &model.script {
        info!(script = %script.display(), "Replaying scripted model decisions");
        return Ok(Arc::new(ScriptedModelCaller::from_file(script)?));
    }
    if let Some(command) = &model.command {
        info!(command = %command, "Using external model process");
        return Ok(Arc::new(
            ProcessModelCaller::new(command).with_args(model.args.iter().cloned()),
        ));
    }
    Err(AssemblyError::NoModelSource)
}

/// Build the agency described by `config`.
///
/// Without `[[agents]]` the built-in planner, coder and reviewer are used,
/// wired `planner -> coder`, `planner -> reviewer` and `coder -> reviewer`.
/// Configured `[[edges]]` are added either way.
pub fn build_agency(
    config: &FileConfig,
    registry: Arc<dyn ToolExecutorPort>,
    model_caller: Arc<dyn ModelCaller>,
    hooks: Vec<Arc<dyn AgentHooks>>,
) -> Result<Agency, AssemblyError> {
    let model = &config.model;
    let mut builder = Agency::builder().config(config.agency.to_agency_config());

    if config.agents.is_empty() {
        builder = builder
            .agent(create_planner_agent(&model.name, &model.reasoning_effort))
            .agent(create_coder_agent(&model.name, &model.reasoning_effort))
            .agent(create_reviewer_agent(&model.name, &model.reasoning_effort));
        for (from, to) in DEFAULT_EDGES {
            builder = builder.edge(from, to, HandoffKind::SendMessage);
        }
    } else {
        let effort = ReasoningEffort::parse_lossy(&model.reasoning_effort);
        for agent in &config.agents {
            builder = builder.agent(Agent::new(agent.to_profile(&model.name, effort)));
        }
    }

    for edge in &config.edges {
        builder = builder.edge(&edge.from, &edge.to, edge.kind);
    }
    if let Some(entry) = &config.agency.entry {
        builder = builder.entry(entry);
    }

    for hook in hooks {
        builder = builder.hooks(hook);
    }
    if config.tools.reminder_interval > 0 {
        builder = builder.hooks(Arc::new(SystemReminderHook::new(
            &config.tools.reminder,
            config.tools.reminder_interval,
        )));
    }

    Ok(builder.build(registry, model_caller)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileAgentConfig, FileEdgeConfig, FileRateLimit};
    use agency_application::AutoRejectConfirmation;
    use agency_domain::{ModelDecision, ToolCall};

    fn registry() -> Arc<dyn ToolExecutorPort> {
        Arc::new(
            build_registry(&FileToolsConfig::default(), Arc::new(AutoRejectConfirmation)).unwrap(),
        )
    }

    #[test]
    fn test_default_agency() {
        let caller = Arc::new(ScriptedModelCaller::new());
        let agency = build_agency(&FileConfig::default(), registry(), caller, Vec::new()).unwrap();

        assert_eq!(agency.entry(), PLANNER);
        assert_eq!(agency.agent_names(), vec![CODER, PLANNER, REVIEWER]);
        assert!(agency.graph().allows(PLANNER, CODER, HandoffKind::SendMessage));
        assert!(agency.graph().allows(CODER, REVIEWER, HandoffKind::SendMessage));
        assert!(!agency.graph().allows(REVIEWER, PLANNER, HandoffKind::SendMessage));
    }

    #[test]
    fn test_custom_agents_and_edges() {
        let config = FileConfig {
            agents: vec![
                FileAgentConfig {
                    name: "lead".into(),
                    tools: vec!["calculator".into()],
                    ..Default::default()
                },
                FileAgentConfig {
                    name: "helper".into(),
                    parent: Some("lead".into()),
                    ..Default::default()
                },
            ],
            edges: vec![FileEdgeConfig {
                from: "lead".into(),
                to: "helper".into(),
                kind: HandoffKind::Transfer,
            }],
            ..Default::default()
        };

        let agency =
            build_agency(&config, registry(), Arc::new(ScriptedModelCaller::new()), Vec::new())
                .unwrap();
        assert_eq!(agency.entry(), "lead");
        assert!(agency.graph().allows("lead", "helper", HandoffKind::Transfer));
        assert!(!agency.graph().allows("lead", "helper", HandoffKind::SendMessage));
    }

    #[test]
    fn test_agent_with_unknown_tool_is_rejected() {
        let config = FileConfig {
            agents: vec![FileAgentConfig {
                name: "lead".into(),
                tools: vec!["teleport".into()],
                ..Default::default()
            }],
            ..Default::default()
        };

        let err = build_agency(&config, registry(), Arc::new(ScriptedModelCaller::new()), Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::Domain(DomainError::UnknownTool { .. })
        ));
    }

    #[test]
    fn test_rate_limits_applied() {
        let mut tools = FileToolsConfig::default();
        tools.rate_limits.insert(
            "calculator".into(),
            FileRateLimit {
                max_calls: 1,
                window_seconds: 60,
            },
        );
        let registry = build_registry(&tools, Arc::new(AutoRejectConfirmation)).unwrap();
        assert_eq!(registry.stats().rate_limited, 1);

        tools.rate_limits.insert(
            "teleport".into(),
            FileRateLimit {
                max_calls: 1,
                window_seconds: 60,
            },
        );
        assert!(matches!(
            build_registry(&tools, Arc::new(AutoRejectConfirmation)),
            Err(AssemblyError::UnknownRateLimitedTool(name)) if name == "teleport"
        ));
    }

    #[test]
    fn test_model_caller_requires_a_source() {
        assert!(matches!(
            build_model_caller(&FileModelConfig::default()),
            Err(AssemblyError::NoModelSource)
        ));

        let model = FileModelConfig {
            command: Some("model-bridge".into()),
            ..Default::default()
        };
        assert!(build_model_caller(&model).is_ok());
    }

    #[tokio::test]
    async fn test_scripted_run_through_default_agency() {
        let caller = ScriptedModelCaller::new()
            .push(
                PLANNER,
                ModelDecision::tool_calls(vec![
                    ToolCall::new("calculator").with_arg("expression", "6*7"),
                ]),
            )
            .push(PLANNER, ModelDecision::final_answer("The answer is 42"));

        let agency =
            build_agency(&FileConfig::default(), registry(), Arc::new(caller), Vec::new()).unwrap();
        let answer = agency.process("What is 6*7?").await.unwrap();
        assert_eq!(answer, "The answer is 42");
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_script_runs_in_parallel() {
        let caller =
            ScriptedModelCaller::from_json(include_str!("../../demos/parallel-review.json")).unwrap();
        let mut config = FileConfig::default();
        config.agency.parallel = true;

        let agency = build_agency(&config, registry(), Arc::new(caller), Vec::new()).unwrap();
        let mut ctx = agency.new_context();
        let output = agency.process_with_context(&mut ctx, "Plan the refactor").await.unwrap();

        assert_eq!(output.response, "Plan ready: about two hours of work, risks reviewed.");
        assert!(ctx.call_stack().is_empty());
        let results: Vec<_> = ctx.history().iter().filter(|t| t.is_tool()).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "Roughly 2 hours.");
        assert_eq!(results[1].content, "Main risk: no tests cover the parser.");
    }
}
