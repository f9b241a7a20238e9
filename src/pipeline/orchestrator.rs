//! Pipeline driver
//!
//! Walks the graph planner → architect → coder (→ coder)* → end, merging
//! each stage's `StateUpdate` into the run state. Node executions are
//! counted; reaching the recursion limit before `End` aborts the run.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use super::context::PipelineContext;
use super::error::PipelineError;
use super::phase_trait::WorkflowPhase;
use super::phases::{ArchitectPhase, CoderPhase, PlannerPhase};
use super::state::{RunState, RunStatus};
use crate::progress::ProgressEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Planner,
    Architect,
    Coder,
    End,
}

impl Node {
    pub const ENTRY: Node = Node::Planner;

    /// Edge taken after this node has run against `state`
    pub fn next(self, state: &RunState) -> Node {
        match self {
            Node::Planner => Node::Architect,
            Node::Architect => Node::Coder,
            Node::Coder if state.is_done() => Node::End,
            Node::Coder => Node::Coder,
            Node::End => Node::End,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Node::Planner => "planner",
            Node::Architect => "architect",
            Node::Coder => "coder",
            Node::End => "end",
        };
        f.write_str(s)
    }
}

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    Completed,
    RecursionLimit { limit: usize },
    Failed { node: Node, error: String },
}

/// Final state of a run together with how it ended
#[derive(Debug)]
pub struct RunOutcome {
    pub state: RunState,
    pub node_executions: usize,
    pub duration: Duration,
    pub error: Option<PipelineError>,
    failed_node: Option<Node>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn termination(&self) -> Termination {
        match (&self.error, self.failed_node) {
            (None, _) => Termination::Completed,
            (Some(PipelineError::RecursionLimit(limit)), _) => {
                Termination::RecursionLimit { limit: *limit }
            }
            (Some(e), node) => Termination::Failed {
                node: node.unwrap_or(Node::End),
                error: e.to_string(),
            },
        }
    }

    pub fn into_result(self) -> Result<RunState, PipelineError> {
        match self.error {
            None => Ok(self.state),
            Some(e) => Err(e),
        }
    }
}

pub struct PipelineOrchestrator {
    context: PipelineContext,
    planner: Box<dyn WorkflowPhase>,
    architect: Box<dyn WorkflowPhase>,
    coder: Box<dyn WorkflowPhase>,
}

impl PipelineOrchestrator {
    pub fn new(context: PipelineContext) -> Self {
        Self {
            context,
            planner: Box::new(PlannerPhase),
            architect: Box::new(ArchitectPhase),
            coder: Box::new(CoderPhase),
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    fn phase(&self, node: Node) -> Option<&dyn WorkflowPhase> {
        match node {
            Node::Planner => Some(self.planner.as_ref()),
            Node::Architect => Some(self.architect.as_ref()),
            Node::Coder => Some(self.coder.as_ref()),
            Node::End => None,
        }
    }

    /// Runs the whole graph for `user_prompt`.
    ///
    /// Never fails outright: errors are reported in the returned outcome
    /// alongside the state reached so far.
    pub async fn run(&self, user_prompt: impl Into<String>) -> RunOutcome {
        let start = Instant::now();
        let limit = self.context.config.recursion_limit;
        let mut state = RunState::new(user_prompt);
        let mut node = Node::ENTRY;
        let mut executions = 0;

        info!(recursion_limit = limit, "Starting pipeline");

        let error = loop {
            let Some(phase) = self.phase(node) else {
                break None;
            };

            if executions >= limit {
                error!(limit, node = %node, "Recursion limit reached");
                break Some((PipelineError::RecursionLimit(limit), node));
            }
            executions += 1;

            if let Err(e) = self.execute_node(phase, &mut state).await {
                break Some((e, node));
            }

            let next = node.next(&state);
            debug!(from = %node, to = %next, executions, "Transition");
            node = next;
        };

        let duration = start.elapsed();
        let (error, failed_node) = match error {
            Some((e, node)) => {
                state.status = RunStatus::Failed;
                error!(node = %node, error = %e, "Pipeline failed");
                self.context.emit(ProgressEvent::Failed {
                    error: e.to_string(),
                });
                (Some(e), Some(node))
            }
            None => {
                info!(
                    executions,
                    duration_ms = duration.as_millis(),
                    "Pipeline complete"
                );
                (None, None)
            }
        };

        RunOutcome {
            state,
            node_executions: executions,
            duration,
            error,
            failed_node,
        }
    }

    async fn execute_node(
        &self,
        phase: &dyn WorkflowPhase,
        state: &mut RunState,
    ) -> Result<(), PipelineError> {
        let name = phase.name();
        self.context.emit(ProgressEvent::PhaseStarted {
            phase: name.to_string(),
        });

        let phase_start = Instant::now();
        let update = phase.execute(state, &self.context).await?;
        state.apply(update)?;

        self.context.emit(ProgressEvent::PhaseComplete {
            phase: name.to_string(),
            duration: phase_start.elapsed(),
        });

        Ok(())
    }
}
