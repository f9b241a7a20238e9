use thiserror::Error;

use crate::llm::{BackendError, StructuredOutputError};
use crate::project::WorkspaceError;
use crate::tools::ToolError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Planner did not return a valid plan: {0}")]
    InvalidPlannerResponse(#[source] StructuredOutputError),

    #[error("Architect did not return a valid task plan: {0}")]
    InvalidArchitectResponse(#[source] StructuredOutputError),

    #[error("Run state is missing {0}")]
    MissingState(&'static str),

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("LLM error: {0}")]
    Llm(#[from] BackendError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Project workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Agent did not finish step {step} within {limit} iterations")]
    AgentIterationsExceeded { step: usize, limit: usize },

    #[error("Recursion limit of {0} reached without finishing the run")]
    RecursionLimit(usize),
}

impl PipelineError {
    /// Backend failures stay `Llm`; a reply that is not a plan is a planner failure
    pub fn from_planner(err: StructuredOutputError) -> Self {
        match err {
            StructuredOutputError::Backend(e) => PipelineError::Llm(e),
            other => PipelineError::InvalidPlannerResponse(other),
        }
    }

    pub fn from_architect(err: StructuredOutputError) -> Self {
        match err {
            StructuredOutputError::Backend(e) => PipelineError::Llm(e),
            other => PipelineError::InvalidArchitectResponse(other),
        }
    }

    pub fn help_message(&self) -> Option<&'static str> {
        match self {
            PipelineError::Llm(BackendError::AuthenticationError { .. }) => {
                Some("Check that the API key for the selected provider is set")
            }
            PipelineError::Llm(BackendError::ConfigurationError { .. }) => {
                Some("Check --provider/--model or the CODEFORGE_PROVIDER and CODEFORGE_MODEL variables")
            }
            PipelineError::Llm(BackendError::TimeoutError { .. }) => {
                Some("Increase --timeout or use a faster model")
            }
            PipelineError::RecursionLimit(_) => {
                Some("Increase --recursion-limit; each file needs one coder step")
            }
            PipelineError::AgentIterationsExceeded { .. } => {
                Some("Increase --max-agent-iterations or use a model that follows tool instructions")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_mapping() {
        let err = PipelineError::from_planner(StructuredOutputError::Empty);
        assert!(matches!(err, PipelineError::InvalidPlannerResponse(_)));

        let err = PipelineError::from_planner(StructuredOutputError::Backend(
            BackendError::RateLimitError,
        ));
        assert!(matches!(err, PipelineError::Llm(BackendError::RateLimitError)));
    }

    #[test]
    fn test_architect_mapping() {
        let err = PipelineError::from_architect(StructuredOutputError::Parse {
            target: "architect",
            message: "missing field".into(),
            raw: "{}".into(),
        });
        assert!(matches!(err, PipelineError::InvalidArchitectResponse(_)));
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_help_messages() {
        assert!(PipelineError::RecursionLimit(10).help_message().is_some());
        assert!(PipelineError::MissingState("plan").help_message().is_none());
    }
}
