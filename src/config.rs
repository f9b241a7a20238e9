//! Configuration management for codeforge
//!
//! Settings are read from environment variables with sensible defaults; CLI
//! flags override them afterwards.
//!
//! # Environment Variables
//!
//! - `CODEFORGE_PROVIDER`: genai provider (openai|anthropic|ollama|gemini|groq|xai) - default: "openai"
//! - `CODEFORGE_MODEL`: Model name - default: "gpt-4o" (or a provider-specific default)
//! - `CODEFORGE_API_BASE_URL`: Custom endpoint for the provider (optional)
//! - `CODEFORGE_REQUEST_TIMEOUT`: Per-request timeout in seconds - default: "120"
//! - `CODEFORGE_OUTPUT_DIR`: Directory that receives generated projects - default: "generated_projects"
//! - `CODEFORGE_RECURSION_LIMIT`: Maximum pipeline node executions - default: "100"
//! - `CODEFORGE_MAX_AGENT_ITERATIONS`: Maximum model turns per coder step - default: "25"
//! - `CODEFORGE_EXCHANGE_LOG`: JSONL file recording every model exchange (optional)
//! - `CODEFORGE_LOG_LEVEL`: Logging level - default: "info"
//!
//! Provider credentials are read by genai from the provider's standard
//! variable (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GROQ_API_KEY`, ...).

use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::pipeline::config::{
    DEFAULT_MAX_AGENT_ITERATIONS, DEFAULT_OUTPUT_DIR, DEFAULT_RECURSION_LIMIT,
};
use crate::pipeline::PipelineConfig;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: openai, anthropic, ollama, gemini, groq, xai")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct CodeforgeConfig {
    pub provider: AdapterKind,
    pub model: String,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: u64,
    /// Root under which each run creates its own project folder
    pub output_dir: PathBuf,
    pub recursion_limit: usize,
    pub max_agent_iterations: usize,
    pub exchange_log: Option<PathBuf>,
    pub log_level: String,
}

impl Default for CodeforgeConfig {
    /// Loads from `CODEFORGE_*` environment variables, falling back to defaults
    fn default() -> Self {
        let provider = env::var("CODEFORGE_PROVIDER")
            .ok()
            .and_then(|s| parse_provider(&s).ok())
            .unwrap_or(AdapterKind::OpenAI);

        let model = env::var("CODEFORGE_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_model_for(provider).to_string());

        let api_base_url = env::var("CODEFORGE_API_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let request_timeout_secs = env::var("CODEFORGE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let output_dir = env::var("CODEFORGE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let recursion_limit = env::var("CODEFORGE_RECURSION_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_RECURSION_LIMIT);

        let max_agent_iterations = env::var("CODEFORGE_MAX_AGENT_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_AGENT_ITERATIONS);

        let exchange_log = env::var("CODEFORGE_EXCHANGE_LOG").ok().map(PathBuf::from);

        let log_level = env::var("CODEFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            api_base_url,
            request_timeout_secs,
            output_dir,
            recursion_limit,
            max_agent_iterations,
            exchange_log,
            log_level,
        }
    }
}

impl CodeforgeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 1800 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 30 minutes".to_string(),
            ));
        }

        // planner + architect + at least one coder pass
        if self.recursion_limit < 3 {
            return Err(ConfigError::ValidationFailed(
                "Recursion limit must be at least 3".to_string(),
            ));
        }

        if self.max_agent_iterations == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max agent iterations must be at least 1".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Per-run limits handed to the pipeline
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_recursion_limit(self.recursion_limit)
            .with_max_agent_iterations(self.max_agent_iterations)
            .with_output_dir(self.output_dir.clone())
    }
}

impl fmt::Display for CodeforgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Codeforge Configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(ref url) = self.api_base_url {
            writeln!(f, "  API Base URL: {}", url)?;
        }
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Output Dir: {}", self.output_dir.display())?;
        writeln!(f, "  Recursion Limit: {}", self.recursion_limit)?;
        writeln!(f, "  Max Agent Iterations: {}", self.max_agent_iterations)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

pub fn parse_provider(s: &str) -> Result<AdapterKind, ConfigError> {
    let lower = s.trim().to_lowercase();
    let normalized = match lower.as_str() {
        "claude" => "anthropic",
        "grok" => "xai",
        other => other,
    };

    AdapterKind::from_lower_str(normalized).ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
}

pub(crate) fn default_model_for(provider: AdapterKind) -> &'static str {
    match provider {
        AdapterKind::Ollama => DEFAULT_OLLAMA_MODEL,
        _ => DEFAULT_MODEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid_config() -> CodeforgeConfig {
        CodeforgeConfig {
            provider: AdapterKind::OpenAI,
            model: "gpt-4o".to_string(),
            api_base_url: None,
            request_timeout_secs: 60,
            output_dir: PathBuf::from("generated_projects"),
            recursion_limit: 100,
            max_agent_iterations: 25,
            exchange_log: None,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("CODEFORGE_PROVIDER"),
            EnvGuard::unset("CODEFORGE_MODEL"),
            EnvGuard::unset("CODEFORGE_REQUEST_TIMEOUT"),
            EnvGuard::unset("CODEFORGE_OUTPUT_DIR"),
            EnvGuard::unset("CODEFORGE_RECURSION_LIMIT"),
            EnvGuard::unset("CODEFORGE_LOG_LEVEL"),
        ];

        let config = CodeforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::OpenAI);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.recursion_limit, DEFAULT_RECURSION_LIMIT);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("CODEFORGE_PROVIDER", "claude"),
            EnvGuard::set("CODEFORGE_MODEL", "claude-sonnet"),
            EnvGuard::set("CODEFORGE_REQUEST_TIMEOUT", "45"),
            EnvGuard::set("CODEFORGE_OUTPUT_DIR", "/tmp/forge"),
            EnvGuard::set("CODEFORGE_RECURSION_LIMIT", "12"),
            EnvGuard::set("CODEFORGE_LOG_LEVEL", "DEBUG"),
        ];

        let config = CodeforgeConfig::default();

        assert_eq!(config.provider, AdapterKind::Anthropic);
        assert_eq!(config.model, "claude-sonnet");
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/forge"));
        assert_eq!(config.recursion_limit, 12);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_ollama_gets_local_default_model() {
        let _guards = vec![
            EnvGuard::set("CODEFORGE_PROVIDER", "ollama"),
            EnvGuard::unset("CODEFORGE_MODEL"),
        ];

        let config = CodeforgeConfig::default();
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.recursion_limit = 2;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_agent_iterations = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_provider() {
        assert_eq!(parse_provider("OpenAI").unwrap(), AdapterKind::OpenAI);
        assert_eq!(parse_provider("claude").unwrap(), AdapterKind::Anthropic);
        assert_eq!(parse_provider("groq").unwrap(), AdapterKind::Groq);
        assert!(matches!(
            parse_provider("nonsense"),
            Err(ConfigError::InvalidProvider(_))
        ));
    }

    #[test]
    fn test_pipeline_config_carries_limits() {
        let config = valid_config();
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.recursion_limit, 100);
        assert_eq!(pipeline.max_agent_iterations, 25);
        assert_eq!(pipeline.output_dir, PathBuf::from("generated_projects"));
    }

    #[test]
    fn test_config_display() {
        let display = valid_config().to_string();
        assert!(display.contains("Codeforge Configuration:"));
        assert!(display.contains("Recursion Limit: 100"));
    }
}
