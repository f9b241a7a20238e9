//! Run state shared between pipeline stages
//!
//! Stages read a `RunState` and return a `StateUpdate` holding only the
//! fields they own; the orchestrator merges updates in.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PipelineError;
use crate::plan::{CoderState, Plan, TaskPlan};
use crate::project::ProjectWorkspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "PENDING",
            RunStatus::InProgress => "IN_PROGRESS",
            RunStatus::Done => "DONE",
            RunStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub user_prompt: String,
    pub plan: Option<Plan>,
    pub project_folder: Option<String>,
    #[serde(skip)]
    pub workspace: Option<ProjectWorkspace>,
    pub task_plan: Option<TaskPlan>,
    pub coder_state: Option<CoderState>,
    pub status: RunStatus,
}

/// Fields a stage hands back; `None` leaves the current value alone
#[derive(Debug, Default)]
pub struct StateUpdate {
    pub plan: Option<Plan>,
    pub workspace: Option<ProjectWorkspace>,
    pub task_plan: Option<TaskPlan>,
    pub coder_state: Option<CoderState>,
    pub status: Option<RunStatus>,
}

impl RunState {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Default::default()
        }
    }

    /// Merges `update` into the state.
    ///
    /// The project folder can be assigned only once.
    pub fn apply(&mut self, update: StateUpdate) -> Result<(), PipelineError> {
        if let Some(workspace) = update.workspace {
            if let Some(existing) = &self.project_folder {
                return Err(PipelineError::InvalidState(format!(
                    "project folder already set to {}",
                    existing
                )));
            }
            self.project_folder = Some(workspace.folder_name().to_string());
            self.workspace = Some(workspace);
        }
        if let Some(plan) = update.plan {
            self.plan = Some(plan);
        }
        if let Some(task_plan) = update.task_plan {
            self.task_plan = Some(task_plan);
        }
        if let Some(coder_state) = update.coder_state {
            self.coder_state = Some(coder_state);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }

    pub fn workspace(&self) -> Result<&ProjectWorkspace, PipelineError> {
        self.workspace
            .as_ref()
            .ok_or(PipelineError::MissingState("project folder"))
    }
}
