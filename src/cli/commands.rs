use clap::{Parser, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

use crate::config::{default_model_for, parse_provider, CodeforgeConfig};

#[derive(Parser, Debug)]
#[command(name = "codeforge")]
#[command(version, about = "Generate a project from a prompt: plan, architect, then code file by file", long_about = None)]
#[command(author = "codeforge contributors")]
pub struct CliArgs {
    /// What to build (read from stdin when omitted)
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Maximum pipeline node executions before the run is aborted
    #[arg(long, value_name = "N")]
    pub recursion_limit: Option<usize>,

    /// Maximum model turns for a single coder step
    #[arg(long, value_name = "N")]
    pub max_agent_iterations: Option<usize>,

    /// LLM provider (openai, anthropic, ollama, gemini, groq, xai)
    #[arg(long, value_parser = parse_adapter_kind)]
    pub provider: Option<AdapterKind>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Directory that receives the generated project folder
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Format of the final run-state dump
    #[arg(long, value_enum, default_value = "human")]
    pub format: RunFormat,

    /// Append every model exchange to this JSONL file
    #[arg(long, value_name = "FILE")]
    pub exchange_log: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output (DEBUG logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all logs except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunFormat {
    Human,
    Json,
}

impl CliArgs {
    /// Layers flag overrides on top of an environment-loaded config
    pub fn apply_to(&self, config: &mut CodeforgeConfig) {
        if let Some(provider) = self.provider {
            config.provider = provider;
            if self.model.is_none() && std::env::var("CODEFORGE_MODEL").is_err() {
                config.model = default_model_for(provider).to_string();
            }
        }
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(limit) = self.recursion_limit {
            config.recursion_limit = limit;
        }
        if let Some(iterations) = self.max_agent_iterations {
            config.max_agent_iterations = iterations;
        }
        if let Some(ref path) = self.exchange_log {
            config.exchange_log = Some(path.clone());
        }
        if let Some(ref level) = self.log_level {
            config.log_level = level.to_lowercase();
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    parse_provider(s).map_err(|e| e.to_string())
}
