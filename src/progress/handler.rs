//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while a run moves through the pipeline
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A pipeline stage started
    PhaseStarted { phase: String },

    /// A pipeline stage finished
    PhaseComplete { phase: String, duration: Duration },

    /// The planner produced a plan and the project folder was registered
    ProjectCreated {
        name: String,
        folder: String,
        root: PathBuf,
    },

    /// The architect produced the ordered implementation steps
    TaskPlanReady { filepaths: Vec<String> },

    /// The coder started a step (`index` is zero-based)
    StepStarted {
        index: usize,
        total: usize,
        filepath: String,
    },

    /// The coder finished a step
    StepComplete {
        index: usize,
        total: usize,
        filepath: String,
        iterations: usize,
        duration: Duration,
    },

    /// The agent finished a step without writing the target file
    StepUnwritten { index: usize, filepath: String },

    /// LLM request started
    LlmRequestStarted { iteration: usize },

    /// LLM response received
    LlmResponseReceived {
        iteration: usize,
        tool_calls: usize,
        response_time: Duration,
    },

    ToolExecutionStarted { tool_name: String, iteration: usize },

    ToolExecutionComplete {
        tool_name: String,
        iteration: usize,
        execution_time: Duration,
        success: bool,
    },

    /// Every step is done
    Completed { project_root: PathBuf, steps: usize },

    /// The run aborted
    Failed { error: String },
}

pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
