use async_trait::async_trait;
use tracing::info;

use crate::llm::query_structured;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::{RunState, RunStatus, StateUpdate};
use crate::plan::Plan;
use crate::progress::ProgressEvent;
use crate::project::{project_folder_name_now, ProjectWorkspace};
use crate::prompts::planner_prompt;

/// Turns the user prompt into a `Plan` and registers the project folder
pub struct PlannerPhase;

#[async_trait]
impl WorkflowPhase for PlannerPhase {
    fn name(&self) -> &'static str {
        "planner"
    }

    async fn execute(
        &self,
        state: &RunState,
        context: &PipelineContext,
    ) -> Result<StateUpdate, PipelineError> {
        let plan: Plan = query_structured(
            context.llm_client.as_ref(),
            &planner_prompt(&state.user_prompt),
            self.name(),
            &context.exchange_log,
        )
        .await
        .map_err(PipelineError::from_planner)?;

        // Folder only exists once there is a valid plan
        let folder = project_folder_name_now(&plan.name);
        let workspace = ProjectWorkspace::new(
            &context.config.output_dir,
            folder,
            context.file_system.clone(),
        );
        workspace.create()?;

        info!(
            project = %plan.name,
            folder = workspace.folder_name(),
            features = plan.features.len(),
            "Plan created"
        );
        context.emit(ProgressEvent::ProjectCreated {
            name: plan.name.clone(),
            folder: workspace.folder_name().to_string(),
            root: workspace.root().to_path_buf(),
        });

        Ok(StateUpdate {
            plan: Some(plan),
            workspace: Some(workspace),
            status: Some(RunStatus::InProgress),
            ..Default::default()
        })
    }
}
