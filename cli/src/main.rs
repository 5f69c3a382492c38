//! CLI entrypoint for Parliament
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use parliament_application::{
    CompositeEventSink, EventSink, LlmGateway, RunDebateInput, RunDebateUseCase,
};
use parliament_domain::config::validation::{has_errors, validate_debate_setup};
use parliament_domain::{BudgetState, ConfigIssue, ConfigIssueCode, DebateSpec, Severity};
use parliament_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, JsonlEventSink, OfflineGateway, OpenAiGateway,
    SpecLoader, StreamEventSink, WireFormat, build_panel, build_search_tool,
};
use parliament_presentation::{
    Cli, ConsoleEventSink, ConsoleFormatter, ProgressEventSink, StreamFormat,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Exit status after Ctrl-C, as shells report SIGINT
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(&cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting Parliament");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    apply_overrides(&mut config, &cli);

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let issues = config.validate();
    report_issues(&issues);
    if has_errors(&issues) {
        bail!("Configuration has errors; fix them and try again");
    }

    // === Debate definition ===
    let topic = require_topic(&cli)?;
    let spec = SpecLoader::load(config.debate.spec.as_deref())?;
    let panel = build_panel(&config.agents)?;
    let step_limit = resolve_step_limit(&config, &spec, panel.len())?;

    // === Dependency Injection ===
    let gateway: Arc<dyn LlmGateway> = if cli.offline {
        info!("Offline mode: using the deterministic stand-in gateway");
        Arc::new(OfflineGateway::new())
    } else {
        Arc::new(OpenAiGateway::from_config(&config.provider)?)
    };
    let search = if cli.offline {
        None
    } else {
        build_search_tool(&config.research)
    };

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let use_case = RunDebateUseCase::new(gateway, config.debate_params(step_limit))
        .with_search(search)
        .with_failure_policy(config.debate.failure_policy.build())
        .with_cancellation(cancellation);

    // === Event sinks ===
    let format = config.output.format.unwrap_or_default();
    let live_transcript =
        cli.stream.is_none() && !cli.quiet && format == parliament_domain::OutputFormat::Full;

    let event_log = match &config.output.event_log {
        Some(path) => Some(JsonlEventSink::new(path).map_err(|source| ConfigError::EventLog {
            path: path.clone(),
            source,
        })?),
        None => None,
    };
    let stream = cli
        .stream
        .map(|format| StreamEventSink::new(wire_format(format), std::io::stdout()));
    let progress = (cli.stream.is_none() && !cli.quiet).then(ProgressEventSink::new);
    let console = progress
        .as_ref()
        .map(|p| ConsoleEventSink::new(live_transcript).with_progress(p.multi()));

    let mut sink = CompositeEventSink::new(Vec::new());
    if let Some(log) = &event_log {
        sink.push(log);
    }
    if let Some(stream) = &stream {
        sink.push(stream);
    }
    // Progress first so a finished spinner is gone before its text prints
    if let Some(progress) = &progress {
        sink.push(progress as &dyn EventSink);
    }
    if let Some(console) = &console {
        sink.push(console);
    }

    if console.is_some() {
        let names: Vec<&str> = panel.agents().iter().map(|a| a.name.as_str()).collect();
        println!();
        println!("{}", ConsoleEventSink::banner(&topic, &names));
    }

    // === Run ===
    let spec = Arc::new(spec);
    let input = RunDebateInput::new(topic, panel, Arc::clone(&spec));
    let outcome = match use_case.execute_with_events(input, &sink).await {
        Ok(outcome) => outcome,
        Err(e) => {
            // The console already rendered the terminal error event
            if console.is_none() {
                eprintln!("Error: {e}");
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    // === Output ===
    if stream.is_none() {
        if live_transcript {
            println!("{}", ConsoleFormatter::summary(&outcome));
        } else {
            println!("{}", ConsoleFormatter::render(format, &outcome, &spec));
        }
    }

    if outcome.is_cancelled() {
        Ok(ExitCode::from(EXIT_CANCELLED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn require_topic(cli: &Cli) -> Result<String> {
    match &cli.topic {
        Some(topic) => Ok(topic.clone()),
        None => bail!("A debate topic is required"),
    }
}

/// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "parliament.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

/// Command-line flags take precedence over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(limit) = cli.step_limit {
        config.debate.step_limit = Some(limit);
    }
    if let Some(policy) = cli.failure_policy {
        config.debate.failure_policy = policy;
    }
    if let Some(spec) = &cli.spec {
        config.debate.spec = Some(spec.clone());
    }
    if cli.no_research {
        config.research.enabled = false;
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if let Some(path) = &cli.event_log {
        config.output.event_log = Some(path.clone());
    }
}

/// Configured step limit, or the recommended one for this spec and panel.
///
/// A limit below the largest round's cost cannot complete even one round
/// and is rejected before anything runs.
fn resolve_step_limit(
    config: &FileConfig,
    spec: &DebateSpec,
    panel_size: usize,
) -> Result<usize, ConfigError> {
    let step_limit = config
        .debate
        .step_limit
        .unwrap_or_else(|| BudgetState::recommended_limit(spec, panel_size));

    let issues = validate_debate_setup(spec, panel_size, step_limit);
    if issues
        .iter()
        .any(|i| i.code == ConfigIssueCode::StepLimitBelowRound)
    {
        return Err(ConfigError::StepLimitTooLow {
            limit: step_limit,
            required: spec.max_round_steps(panel_size),
            panel_size,
        });
    }
    report_issues(&issues);

    info!(
        "Step limit {} ({} required for {} agent(s))",
        step_limit,
        spec.total_steps(panel_size),
        panel_size
    );
    Ok(step_limit)
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
}

fn wire_format(format: StreamFormat) -> WireFormat {
    match format {
        StreamFormat::Sse => WireFormat::Sse,
        StreamFormat::Ndjson => WireFormat::Ndjson,
    }
}

/// Cancel the debate on Ctrl-C; it stops at the next round or turn boundary
fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; finishing the current turn before stopping");
            token.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parliament_application::FailurePolicyKind;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("parliament").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = FileConfig::default();
        config.debate.step_limit = Some(40);

        apply_overrides(
            &mut config,
            &cli(&[
                "--step-limit",
                "9",
                "--failure-policy",
                "halt_on_total",
                "--no-research",
                "--output",
                "json",
                "topic",
            ]),
        );

        assert_eq!(config.debate.step_limit, Some(9));
        assert_eq!(config.debate.failure_policy, FailurePolicyKind::HaltOnTotal);
        assert!(!config.research.enabled);
        assert_eq!(
            config.output.format,
            Some(parliament_domain::OutputFormat::Json)
        );
    }

    #[test]
    fn test_unset_step_limit_uses_recommendation() {
        let spec = SpecLoader::builtin().unwrap();
        let limit = resolve_step_limit(&FileConfig::default(), &spec, 4).unwrap();
        assert_eq!(limit, BudgetState::recommended_limit(&spec, 4));
    }

    #[test]
    fn test_step_limit_below_one_round_fails_fast() {
        let spec = SpecLoader::builtin().unwrap();
        let mut config = FileConfig::default();
        config.debate.step_limit = Some(3);

        let err = resolve_step_limit(&config, &spec, 4).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::StepLimitTooLow {
                limit: 3,
                required: 4,
                panel_size: 4
            }
        ));
    }

    #[test]
    fn test_step_limit_covering_one_round_is_accepted() {
        // Enough for a round but not the debate: the engine stops later
        let spec = SpecLoader::builtin().unwrap();
        let mut config = FileConfig::default();
        config.debate.step_limit = Some(4);
        assert_eq!(resolve_step_limit(&config, &spec, 4).unwrap(), 4);
    }
}
