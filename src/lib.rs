//! codeforge - generate a small software project from a natural-language prompt
//!
//! A run walks three stages over an explicit state value:
//!
//! - **Planner**: asks the model for a [`Plan`] (name, stack, features, files)
//!   and creates a timestamped project folder under the output directory.
//! - **Architect**: expands the plan into an ordered [`TaskPlan`], one
//!   implementation step per file.
//! - **Coder**: runs a tool-using agent once per step; the agent reads and
//!   writes files confined to the project folder.
//!
//! # Example
//!
//! ```ignore
//! use codeforge::{PipelineConfig, PipelineContext, PipelineOrchestrator, RealFileSystem};
//! use codeforge::llm::LazyLLMClient;
//! use std::sync::Arc;
//!
//! async fn generate(config: codeforge::CodeforgeConfig) {
//!     let context = PipelineContext::new(
//!         Arc::new(LazyLLMClient::new(config.clone())),
//!         Arc::new(RealFileSystem::new()),
//!         config.pipeline_config(),
//!     );
//!     let outcome = PipelineOrchestrator::new(context)
//!         .run("Build a todo app in plain HTML, CSS and JS")
//!         .await;
//!     println!("{:?}", outcome.termination());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod fs;
pub mod llm;
pub mod pipeline;
pub mod plan;
pub mod progress;
pub mod project;
pub mod prompts;
pub mod tools;
pub mod util;

pub use config::{CodeforgeConfig, ConfigError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use llm::{BackendError, LLMClient, MockLLMClient, MockResponse};
pub use pipeline::{
    PipelineConfig, PipelineContext, PipelineError, PipelineOrchestrator, RunOutcome, RunState,
    RunStatus, Termination,
};
pub use plan::{CoderState, ImplementationTask, Plan, TaskPlan};
pub use project::{ProjectWorkspace, WorkspaceError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_codeforge() {
        assert_eq!(NAME, "codeforge");
    }
}
