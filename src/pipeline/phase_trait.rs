use async_trait::async_trait;

use super::context::PipelineContext;
use super::error::PipelineError;
use super::state::{RunState, StateUpdate};

/// One node of the pipeline graph
#[async_trait]
pub trait WorkflowPhase: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(
        &self,
        state: &RunState,
        context: &PipelineContext,
    ) -> Result<StateUpdate, PipelineError>;
}
