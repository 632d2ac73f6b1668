//! CLI entrypoint for agency
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;
mod console;

use agency_application::{AgentHooks, AutoApproveConfirmation, ConfirmationPort, TracingHooks};
use agency_infrastructure::{
    ConfigLoadError, ConfigLoader, build_agency, build_model_caller, build_registry,
};
use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::Cli;
use console::ConsoleConfirmation;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging: stderr always, plus a non-blocking file writer
/// with `--log-file`. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file needs a file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    cli.apply_overrides(&mut config);
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigLoadError::Invalid(errors).into());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!("\nEffective configuration:\n");
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        bail!("A task is required. Example: agency --script demo.json \"Review src/\"");
    };

    // === Dependency Injection ===
    let confirmation: Arc<dyn ConfirmationPort> = if config.tools.auto_approve_dangerous {
        Arc::new(AutoApproveConfirmation)
    } else {
        Arc::new(ConsoleConfirmation::new())
    };
    let registry = Arc::new(build_registry(&config.tools, confirmation)?);
    let model_caller = build_model_caller(&config.model)?;

    let mut hooks: Vec<Arc<dyn AgentHooks>> = Vec::new();
    if cli.verbose > 0 {
        hooks.push(Arc::new(TracingHooks));
    }
    let agency = build_agency(&config, registry, model_caller, hooks)?;

    info!(
        entry = %agency.entry(),
        mode = %agency.config().mode,
        "Starting agency"
    );
    if !cli.quiet {
        console::print_header(
            agency.entry(),
            &agency.agent_names(),
            agency.config().mode.is_parallel(),
            input,
        );
    }

    let cancellation = CancellationToken::new();
    let interrupt = {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling run");
                token.cancel();
            }
        })
    };

    let mut ctx = agency.new_context().with_cancellation(cancellation);
    let result = agency.process_with_context(&mut ctx, input).await;
    interrupt.abort();

    match result {
        Ok(output) => {
            console::print_output(&output, cli.quiet);
            Ok(())
        }
        Err(e) => {
            console::print_partial(&e);
            Err(e.into())
        }
    }
}
