//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::PhaseStarted { phase } => {
                info!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::ProjectCreated { name, folder, root } => {
                info!(
                    project = %name,
                    folder = %folder,
                    root = %root.display(),
                    "Project created"
                );
            }
            ProgressEvent::TaskPlanReady { filepaths } => {
                info!(steps = filepaths.len(), "Implementation plan ready");
                for (i, path) in filepaths.iter().enumerate() {
                    debug!(step = i + 1, filepath = %path, "Planned step");
                }
            }
            ProgressEvent::StepStarted {
                index,
                total,
                filepath,
            } => {
                info!(
                    progress = format!("{}/{}", index + 1, total),
                    filepath = %filepath,
                    "Starting step"
                );
            }
            ProgressEvent::StepComplete {
                index,
                total,
                filepath,
                iterations,
                duration,
            } => {
                info!(
                    progress = format!("{}/{}", index + 1, total),
                    filepath = %filepath,
                    iterations,
                    duration_ms = duration.as_millis(),
                    "Step complete"
                );
            }
            ProgressEvent::StepUnwritten { index, filepath } => {
                warn!(step = index + 1, filepath = %filepath, "Step finished without writing its file");
            }
            ProgressEvent::LlmRequestStarted { iteration } => {
                debug!(iteration, "Sending request to LLM");
            }
            ProgressEvent::LlmResponseReceived {
                iteration,
                tool_calls,
                response_time,
            } => {
                debug!(
                    iteration,
                    tool_calls,
                    response_time_ms = response_time.as_millis(),
                    "Received LLM response"
                );
            }
            ProgressEvent::ToolExecutionStarted {
                tool_name,
                iteration,
            } => {
                debug!(tool = %tool_name, iteration, "Executing tool");
            }
            ProgressEvent::ToolExecutionComplete {
                tool_name,
                iteration,
                execution_time,
                success,
            } => {
                if *success {
                    debug!(
                        tool = %tool_name,
                        iteration,
                        execution_time_ms = execution_time.as_millis(),
                        "Tool execution complete"
                    );
                } else {
                    warn!(
                        tool = %tool_name,
                        iteration,
                        execution_time_ms = execution_time.as_millis(),
                        "Tool execution failed"
                    );
                }
            }
            ProgressEvent::Completed {
                project_root,
                steps,
            } => {
                info!(
                    root = %project_root.display(),
                    steps,
                    "Project complete"
                );
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Run failed");
            }
        }
    }
}
