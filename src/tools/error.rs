use thiserror::Error;

use crate::project::WorkspaceError;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },

    #[error("Path is outside the project folder: {0}")]
    PathOutsideProject(String),

    #[error("Path does not exist: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl ToolError {
    pub fn invalid_arguments(tool: &'static str, message: impl Into<String>) -> Self {
        ToolError::InvalidArguments {
            tool,
            message: message.into(),
        }
    }

    /// Errors the model caused and can correct on its next turn.
    /// Anything else aborts the step.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ToolError::Io { .. })
    }
}

impl From<WorkspaceError> for ToolError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::PathOutsideProject(p) => ToolError::PathOutsideProject(p),
            WorkspaceError::NotFound(p) => ToolError::NotFound(p),
            WorkspaceError::Io { path, message } => ToolError::Io { path, message },
        }
    }
}
