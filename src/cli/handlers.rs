use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::commands::{CliArgs, RunFormat};
use super::output::RunFormatter;
use crate::config::CodeforgeConfig;
use crate::fs::RealFileSystem;
use crate::llm::{ExchangeLogger, LazyLLMClient};
use crate::pipeline::{PipelineContext, PipelineOrchestrator, RunOutcome};
use crate::progress::{ConsoleHandler, ProgressHandler};

/// Runs one generation from the command line and returns the process exit code
pub async fn handle_run(args: &CliArgs) -> i32 {
    match execute_run(args).await {
        Ok(outcome) if outcome.is_success() => 0,
        Ok(outcome) => {
            if let Some(err) = &outcome.error {
                eprintln!("Error: {}", err);
                if let Some(help) = err.help_message() {
                    eprintln!("Hint: {}", help);
                }
            }
            1
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

async fn execute_run(args: &CliArgs) -> Result<RunOutcome> {
    let mut config = CodeforgeConfig::default();
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);

    let prompt = match &args.prompt {
        Some(p) => p.clone(),
        None => read_prompt().context("Failed to read prompt from stdin")?,
    };
    if prompt.trim().is_empty() {
        bail!("Prompt cannot be empty");
    }

    let orchestrator = build_orchestrator(&config, args.format);
    info!(output_dir = %config.output_dir.display(), "Generating project");

    let outcome = orchestrator.run(prompt).await;

    let dump = RunFormatter::new(args.format)
        .format(&outcome)
        .context("Failed to format run state")?;
    println!("{}", dump);

    Ok(outcome)
}

fn build_orchestrator(config: &CodeforgeConfig, format: RunFormat) -> PipelineOrchestrator {
    // Keep stdout clean for the JSON dump
    let progress: Arc<dyn ProgressHandler> = match format {
        RunFormat::Human => Arc::new(ConsoleHandler::stdout()),
        RunFormat::Json => Arc::new(ConsoleHandler::stderr()),
    };
    let exchange_log = Arc::new(ExchangeLogger::new(config.exchange_log.as_deref()));

    let context = PipelineContext::new(
        Arc::new(LazyLLMClient::new(config.clone())),
        Arc::new(RealFileSystem::new()),
        config.pipeline_config(),
    )
    .with_progress(progress)
    .with_exchange_log(exchange_log);

    PipelineOrchestrator::new(context)
}

/// Interactive terminals get a single-line prompt; piped input is read whole
fn read_prompt() -> io::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Enter your project prompt: ");
        io::stderr().flush()?;
        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    } else {
        let text = io::read_to_string(stdin)?;
        Ok(text.trim().to_string())
    }
}
