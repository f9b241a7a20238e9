use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm::query_structured;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::phase_trait::WorkflowPhase;
use crate::pipeline::state::{RunState, StateUpdate};
use crate::plan::TaskPlan;
use crate::progress::ProgressEvent;
use crate::prompts::architect_prompt;

/// Expands the `Plan` into ordered per-file implementation steps
pub struct ArchitectPhase;

#[async_trait]
impl WorkflowPhase for ArchitectPhase {
    fn name(&self) -> &'static str {
        "architect"
    }

    async fn execute(
        &self,
        state: &RunState,
        context: &PipelineContext,
    ) -> Result<StateUpdate, PipelineError> {
        let plan = state.plan.as_ref().ok_or(PipelineError::MissingState("plan"))?;
        let plan_json = serde_json::to_string(plan)
            .map_err(|e| PipelineError::InvalidState(format!("plan is not serializable: {}", e)))?;

        let task_plan: TaskPlan = query_structured(
            context.llm_client.as_ref(),
            &architect_prompt(&plan_json),
            self.name(),
            &context.exchange_log,
        )
        .await
        .map_err(PipelineError::from_architect)?;
        let task_plan = task_plan.with_plan(plan.clone());

        if task_plan.is_empty() {
            warn!("Architect returned no implementation steps");
        }
        info!(steps = task_plan.len(), "Task plan created");

        context.emit(ProgressEvent::TaskPlanReady {
            filepaths: task_plan
                .implementation_steps
                .iter()
                .map(|s| s.filepath.clone())
                .collect(),
        });

        Ok(StateUpdate {
            task_plan: Some(task_plan),
            ..Default::default()
        })
    }
}
