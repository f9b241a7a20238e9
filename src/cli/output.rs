//! Final run-state dump, printed after the pipeline stops
//!
//! Human output is a short framed summary; JSON output is a single object
//! suitable for scripting.

use anyhow::{Context, Result};
use serde::Serialize;

use super::commands::RunFormat;
use crate::pipeline::{RunOutcome, RunStatus, Termination};
use crate::plan::{Plan, TaskPlan};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

/// Serializable view of a finished run
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub status: RunStatus,
    pub termination: Termination,
    pub user_prompt: &'a str,
    pub project_folder: Option<&'a str>,
    pub project_root: Option<String>,
    pub plan: Option<&'a Plan>,
    pub task_plan: Option<&'a TaskPlan>,
    pub current_step_idx: Option<usize>,
    pub unwritten_steps: Vec<usize>,
    pub node_executions: usize,
    pub duration_ms: u128,
}

impl<'a> RunReport<'a> {
    pub fn from_outcome(outcome: &'a RunOutcome) -> Self {
        let state = &outcome.state;
        let coder = state.coder_state.as_ref();
        Self {
            status: state.status,
            termination: outcome.termination(),
            user_prompt: &state.user_prompt,
            project_folder: state.project_folder.as_deref(),
            project_root: state
                .workspace
                .as_ref()
                .map(|ws| ws.root().display().to_string()),
            plan: state.plan.as_ref(),
            task_plan: state.task_plan.as_ref(),
            current_step_idx: coder.map(|c| c.current_step_idx),
            unwritten_steps: coder.map(|c| c.unwritten_steps.clone()).unwrap_or_default(),
            node_executions: outcome.node_executions,
            duration_ms: outcome.duration.as_millis(),
        }
    }
}

pub struct RunFormatter {
    format: RunFormat,
}

impl RunFormatter {
    pub fn new(format: RunFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, outcome: &RunOutcome) -> Result<String> {
        let report = RunReport::from_outcome(outcome);
        match self.format {
            RunFormat::Json => serde_json::to_string_pretty(&report)
                .context("Failed to serialize run state to JSON"),
            RunFormat::Human => Ok(format_human(&report)),
        }
    }
}

fn format_human(report: &RunReport<'_>) -> String {
    let mut output = String::new();

    if report.termination == Termination::Completed {
        output.push_str("\u{2713} Run Finished\n");
    } else {
        output.push_str("\u{2717} Run Failed\n");
    }
    output.push_str(RULE);
    output.push_str("\n\n");

    output.push_str(&format!("Status:      {}\n", report.status));
    match &report.termination {
        Termination::Completed => {}
        Termination::RecursionLimit { limit } => {
            output.push_str(&format!("Stopped:     recursion limit {} reached\n", limit));
        }
        Termination::Failed { node, error } => {
            output.push_str(&format!("Stopped:     {} failed: {}\n", node, error));
        }
    }
    if let Some(plan) = report.plan {
        output.push_str(&format!("Project:     {}\n", plan.name));
    }
    if let Some(root) = &report.project_root {
        output.push_str(&format!("Location:    {}\n", root));
    }
    output.push('\n');

    if let Some(task_plan) = report.task_plan {
        let done = report.current_step_idx.unwrap_or(0);
        output.push_str(&format!("Steps ({}/{}):\n", done.min(task_plan.len()), task_plan.len()));
        for (i, task) in task_plan.implementation_steps.iter().enumerate() {
            let is_last = i + 1 == task_plan.len();
            let connector = if is_last { "\u{2514}" } else { "\u{251C}" };
            let mark = if report.unwritten_steps.contains(&i) {
                " (not written)"
            } else if i >= done {
                " (pending)"
            } else {
                ""
            };
            output.push_str(&format!("{}\u{2500} {}{}\n", connector, task.filepath, mark));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Node executions: {}  Duration: {:.1}s\n",
        report.node_executions,
        report.duration_ms as f64 / 1000.0
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::llm::{MockLLMClient, MockResponse};
    use crate::pipeline::{PipelineConfig, PipelineContext, PipelineOrchestrator};
    use serde_json::json;
    use std::sync::Arc;

    async fn finished_run() -> RunOutcome {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::json(&json!({"name": "Todo App"})));
        llm.add_response(MockResponse::json(&json!({
            "implementation_steps": [
                {"filepath": "index.html", "task_description": "markup"},
                {"filepath": "app.js", "task_description": "logic"}
            ]
        })));
        llm.add_response(MockResponse::with_tool_calls(
            "",
            vec![MockLLMClient::write_file_call("c1", "index.html", "<html>")],
        ));
        llm.add_response(MockResponse::text("done"));
        // Second step answers without writing
        llm.add_response(MockResponse::text("nothing to do"));

        let context = PipelineContext::new(
            llm,
            Arc::new(MockFileSystem::new()),
            PipelineConfig::default().with_output_dir("/out"),
        );
        PipelineOrchestrator::new(context).run("todo").await
    }

    #[tokio::test]
    async fn test_json_dump() {
        let outcome = finished_run().await;
        let text = RunFormatter::new(RunFormat::Json).format(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["status"], json!("DONE"));
        assert_eq!(value["termination"]["reason"], json!("completed"));
        assert_eq!(value["plan"]["name"], json!("Todo App"));
        assert_eq!(value["current_step_idx"], json!(2));
        assert_eq!(value["unwritten_steps"], json!([1]));
        assert_eq!(value["node_executions"], json!(5));
        assert!(value["project_root"]
            .as_str()
            .unwrap()
            .starts_with("/out/todo_app_"));
    }

    #[tokio::test]
    async fn test_human_dump() {
        let outcome = finished_run().await;
        let text = RunFormatter::new(RunFormat::Human).format(&outcome).unwrap();

        assert!(text.starts_with("\u{2713} Run Finished"));
        assert!(text.contains("Status:      DONE"));
        assert!(text.contains("Project:     Todo App"));
        assert!(text.contains("Steps (2/2):"));
        assert!(text.contains("app.js (not written)"));
    }

    #[tokio::test]
    async fn test_human_dump_for_failed_planner() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text("not json"));
        let context = PipelineContext::new(
            llm,
            Arc::new(MockFileSystem::new()),
            PipelineConfig::default().with_output_dir("/out"),
        );
        let outcome = PipelineOrchestrator::new(context).run("x").await;

        let text = RunFormatter::new(RunFormat::Human).format(&outcome).unwrap();
        assert!(text.starts_with("\u{2717} Run Failed"));
        assert!(text.contains("Status:      FAILED"));
        assert!(text.contains("planner failed"));
        assert!(!text.contains("Location:"));
    }
}
