//! CLI entrypoint for LLM Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    ActiveRuns, ConversationEvent, ConversationLogger, NoConversationLogger, RunCouncilError,
    RunCouncilInput, RunCouncilUseCase, progress_channel,
};
use council_domain::{Lineup, Model, OutputFormat, Question, parse_models};
use council_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, OpenRouterInvoker};
use council_presentation::{
    Cli, ConsoleFormatter, OutputConfig, ProgressPresenter, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging: RUST_LOG wins, otherwise the verbosity flag decides
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    config.validate().context("Invalid configuration")?;

    let output = OutputConfig::resolve(cli.output, config.output.format, config.output.color, cli.quiet);
    output.apply_color();

    // === Dependency Injection ===
    let invoker = Arc::new(
        OpenRouterInvoker::from_env(config.openrouter.api_url.as_str(), &config.openrouter.api_key_env)?,
    );

    if cli.list_free_models {
        let models = invoker
            .free_models()
            .await
            .context("Failed to fetch the model catalogue")?;
        for model in &models {
            match model.context_length {
                Some(context) => println!("{:<55} {} ({} tokens)", model.id, model.name, context),
                None => println!("{:<55} {}", model.id, model.name),
            }
        }
        return Ok(());
    }

    let question = match cli.question.as_deref() {
        Some(q) => Question::try_new(q)?,
        None => bail!("Question is required. Run with --help for usage."),
    };
    let input = RunCouncilInput::new(question, lineup(&cli, &config)?);
    let input = if cli.title { input.with_title() } else { input };

    let policy = config.council_policy()?;
    let (emitter, mut stream) = progress_channel(policy.event_buffer);

    let conversation_id = cli
        .conversation
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let logger: Box<dyn ConversationLogger> = match cli
        .transcript
        .as_ref()
        .or(config.logging.transcript_dir.as_ref())
        .and_then(|dir| JsonlConversationLogger::for_conversation(dir, &conversation_id))
    {
        Some(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Box::new(logger)
        }
        None => Box::new(NoConversationLogger),
    };

    let mut presenter: Option<Box<dyn ProgressPresenter>> = if !output.show_progress {
        None
    } else if std::io::stderr().is_terminal() {
        Some(Box::new(ProgressReporter::new()))
    } else {
        Some(Box::new(SimpleProgress))
    };

    let active_runs = ActiveRuns::new();
    let run = active_runs.begin(conversation_id.clone(), emitter)?;
    let use_case = RunCouncilUseCase::new(invoker, policy);

    info!(conversation = %conversation_id, "Starting LLM Council");

    // Dropping the stream cancels the run, so Ctrl-C simply stops consuming.
    let consume = async move {
        loop {
            let event = tokio::select! {
                event = stream.next() => event,
                _ = tokio::signal::ctrl_c() => {
                    warn!("Interrupted, cancelling the run");
                    None
                }
            };
            let Some(event) = event else { break };

            logger.log(ConversationEvent::from_progress(&conversation_id, &event));
            if output.streams_events() {
                println!("{}", ConsoleFormatter::format_event(&event));
            } else if let Some(presenter) = presenter.as_mut() {
                presenter.on_event(&event);
            }
        }
    };

    let (result, ()) = tokio::join!(use_case.execute(input, run), consume);

    match result {
        Ok(report) => {
            let rendered = match output.format {
                OutputFormat::Verdict => ConsoleFormatter::format_verdict_only(&report),
                OutputFormat::Full => ConsoleFormatter::format(&report),
                OutputFormat::Json => ConsoleFormatter::format_json(&report),
                OutputFormat::Events => return Ok(()),
            };
            println!("{}", rendered);
            Ok(())
        }
        Err(RunCouncilError::Cancelled) => {
            eprintln!("Cancelled.");
            std::process::exit(130);
        }
        Err(error) => {
            if !output.streams_events() {
                eprint!("{}", ConsoleFormatter::format_error(&error));
            }
            std::process::exit(1);
        }
    }
}

/// Council lineup from config, with `-m` and `--chairman` taking precedence.
fn lineup(cli: &Cli, config: &FileConfig) -> Result<Lineup> {
    let configured = config.lineup()?;
    if cli.model.is_empty() && cli.chairman.is_none() {
        return Ok(configured);
    }

    let competitors = if cli.model.is_empty() {
        configured.competitors().to_vec()
    } else {
        parse_models(cli.model.as_slice())?
    };
    let chairman = match &cli.chairman {
        Some(id) => Model::new(id.as_str())?,
        None => configured.chairman().clone(),
    };
    Ok(Lineup::new(competitors, chairman)?)
}
