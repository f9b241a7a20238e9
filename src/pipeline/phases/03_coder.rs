use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::pipeline::agent::AgentLoop;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::{RunState, RunStatus, StateUpdate};
use crate::plan::CoderState;
use crate::progress::ProgressEvent;
use crate::project::WorkspaceError;
use crate::prompts::{coder_system_prompt, compose_task_prompt};
use crate::tools::ToolSystem;

/// Implements one step of the task plan per invocation.
///
/// Returns `RunStatus::Done` once `current_step_idx` reaches the number of
/// steps; the orchestrator keeps re-entering this phase until then.
pub struct CoderPhase;

#[async_trait]
impl WorkflowPhase for CoderPhase {
    fn name(&self) -> &'static str {
        "coder"
    }

    async fn execute(
        &self,
        state: &RunState,
        context: &PipelineContext,
    ) -> Result<StateUpdate, PipelineError> {
        let mut coder_state = match &state.coder_state {
            Some(existing) => existing.clone(),
            None => CoderState::new(
                state
                    .task_plan
                    .clone()
                    .ok_or(PipelineError::MissingState("task plan"))?,
            ),
        };
        let workspace = state.workspace()?;
        let total = coder_state.total_steps();

        let Some(task) = coder_state.current_task().cloned() else {
            info!(steps = total, root = %workspace.root().display(), "All steps complete");
            context.emit(ProgressEvent::Completed {
                project_root: workspace.root().to_path_buf(),
                steps: total,
            });
            return Ok(StateUpdate {
                coder_state: Some(coder_state),
                status: Some(RunStatus::Done),
                ..Default::default()
            });
        };

        let idx = coder_state.current_step_idx;
        let start = Instant::now();
        context.emit(ProgressEvent::StepStarted {
            index: idx,
            total,
            filepath: task.filepath.clone(),
        });

        let existing = match workspace.read_existing(&task.filepath) {
            Ok(existing) => existing,
            Err(WorkspaceError::PathOutsideProject(path)) => {
                warn!(
                    step = idx + 1,
                    filepath = %path,
                    "Step targets a path outside the project, skipping"
                );
                context.emit(ProgressEvent::StepUnwritten {
                    index: idx,
                    filepath: task.filepath.clone(),
                });
                coder_state.unwritten_steps.push(idx);
                coder_state.advance();
                context.emit(ProgressEvent::StepComplete {
                    index: idx,
                    total,
                    filepath: task.filepath,
                    iterations: 0,
                    duration: start.elapsed(),
                });
                return Ok(StateUpdate {
                    coder_state: Some(coder_state),
                    status: Some(RunStatus::InProgress),
                    ..Default::default()
                });
            }
            Err(e) => return Err(e.into()),
        };
        debug!(
            filepath = %task.filepath,
            existing_bytes = existing.as_ref().map(|c| c.len()).unwrap_or(0),
            "Composing task prompt"
        );
        let user_prompt =
            compose_task_prompt(&task.task_description, &task.filepath, existing.as_deref());

        let tool_system = ToolSystem::new(workspace.clone());
        let transcript = AgentLoop::new(context, self.name(), idx)
            .run(coder_system_prompt(), user_prompt, &tool_system)
            .await?;

        if !tool_system.has_written(&task.filepath) {
            warn!(
                step = idx + 1,
                filepath = %task.filepath,
                written = ?transcript.files_written,
                "Agent finished without writing the step's file"
            );
            context.emit(ProgressEvent::StepUnwritten {
                index: idx,
                filepath: task.filepath.clone(),
            });
            coder_state.unwritten_steps.push(idx);
        }

        coder_state.advance();
        context.emit(ProgressEvent::StepComplete {
            index: idx,
            total,
            filepath: task.filepath,
            iterations: transcript.iterations,
            duration: start.elapsed(),
        });

        Ok(StateUpdate {
            coder_state: Some(coder_state),
            status: Some(RunStatus::InProgress),
            ..Default::default()
        })
    }
}
