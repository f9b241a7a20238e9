//! Plan, task plan and coder progress
//!
//! `Plan` and `TaskPlan` derive `JsonSchema`: their schemas are the output
//! contract sent to the model by the planner and architect stages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// High-level description of the project to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Short human-readable project name
    pub name: String,

    /// One-paragraph summary of what the project is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Languages, frameworks and libraries the project uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub techstack: Option<String>,

    /// User-facing features, in priority order
    #[serde(default)]
    pub features: Vec<String>,

    /// Files the project needs, relative to the project root
    #[serde(default)]
    pub files: Vec<String>,
}

/// One file-level unit of work for the coder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImplementationTask {
    /// Path of the file to create or modify, relative to the project root
    pub filepath: String,

    /// Detailed description of what to implement in this file
    pub task_description: String,
}

/// Ordered implementation steps derived from a `Plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TaskPlan {
    /// Steps in execution order
    pub implementation_steps: Vec<ImplementationTask>,

    /// The plan these steps implement; attached after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub plan: Option<Plan>,
}

impl TaskPlan {
    pub fn len(&self) -> usize {
        self.implementation_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementation_steps.is_empty()
    }

    pub fn step(&self, idx: usize) -> Option<&ImplementationTask> {
        self.implementation_steps.get(idx)
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }
}

/// Progress of the coder stage through a `TaskPlan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoderState {
    pub task_plan: TaskPlan,
    pub current_step_idx: usize,
    /// Steps whose agent run ended without writing the target file
    #[serde(default)]
    pub unwritten_steps: Vec<usize>,
}

impl CoderState {
    pub fn new(task_plan: TaskPlan) -> Self {
        Self {
            task_plan,
            current_step_idx: 0,
            unwritten_steps: Vec::new(),
        }
    }

    pub fn total_steps(&self) -> usize {
        self.task_plan.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_step_idx >= self.task_plan.len()
    }

    pub fn current_task(&self) -> Option<&ImplementationTask> {
        self.task_plan.step(self.current_step_idx)
    }

    pub fn advance(&mut self) {
        self.current_step_idx += 1;
    }
}
