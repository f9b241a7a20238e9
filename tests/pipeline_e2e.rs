//! End-to-end pipeline tests
//!
//! Drive the full planner → architect → coder graph with a scripted model
//! against a real temporary directory.

use codeforge::llm::{MockLLMClient, MockResponse};
use codeforge::progress::{ProgressEvent, ProgressHandler};
use codeforge::prompts::NO_EXISTING_CONTENT;
use codeforge::{
    PipelineConfig, PipelineContext, PipelineError, PipelineOrchestrator, RealFileSystem,
    RunStatus, Termination,
};
use serde_json::json;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records every progress event for later assertions
#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    fn coder_invocations(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::PhaseStarted { phase } if phase == "coder"))
            .count()
    }

    fn written_order(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::StepComplete { filepath, .. } => Some(filepath),
                _ => None,
            })
            .collect()
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn orchestrator(
    llm: Arc<MockLLMClient>,
    output: &TempDir,
    recursion_limit: usize,
) -> (PipelineOrchestrator, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::default());
    let context = PipelineContext::new(
        llm,
        Arc::new(RealFileSystem::new()),
        PipelineConfig::default()
            .with_output_dir(output.path())
            .with_recursion_limit(recursion_limit),
    )
    .with_progress(handler.clone());
    (PipelineOrchestrator::new(context), handler)
}

fn todo_plan() -> serde_json::Value {
    json!({
        "name": "Todo App",
        "description": "A browser todo list",
        "techstack": "HTML, CSS, JavaScript",
        "features": ["add todos", "complete todos", "delete todos"],
        "files": ["index.html", "style.css", "script.js"]
    })
}

fn todo_task_plan() -> serde_json::Value {
    json!({
        "implementation_steps": [
            {"filepath": "index.html", "task_description": "Markup with a form and a list; link style.css and script.js"},
            {"filepath": "style.css", "task_description": "Style the list and the form"},
            {"filepath": "script.js", "task_description": "Add, toggle and delete todos in the list"}
        ]
    })
}

fn script_todo_run(llm: &MockLLMClient) {
    llm.add_response(MockResponse::json(&todo_plan()));
    llm.add_response(MockResponse::json(&todo_task_plan()));
    for (i, (path, content)) in [
        ("index.html", "<!DOCTYPE html><html><body><ul id=\"todos\"></ul></body></html>"),
        ("style.css", "#todos { list-style: none; }"),
        ("script.js", "const todos = [];"),
    ]
    .into_iter()
    .enumerate()
    {
        llm.add_response(MockResponse::with_tool_calls(
            "",
            vec![
                MockLLMClient::list_files_call(format!("list{}", i)),
                MockLLMClient::write_file_call(format!("write{}", i), path, content),
            ],
        ));
        llm.add_response(MockResponse::text(format!("Implemented {}", path)));
    }
}

fn project_dirs(output: &TempDir) -> Vec<std::path::PathBuf> {
    fs::read_dir(output.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect()
}

#[tokio::test]
async fn test_todo_app_end_to_end() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    script_todo_run(&llm);

    let (orchestrator, handler) = orchestrator(llm.clone(), &output, 100);
    let outcome = orchestrator.run("Build a todo app").await;

    assert!(outcome.is_success(), "{:?}", outcome.error);
    assert_eq!(outcome.termination(), Termination::Completed);
    assert_eq!(outcome.state.status, RunStatus::Done);
    assert_eq!(llm.remaining_responses(), 0);

    let folder = outcome.state.project_folder.clone().unwrap();
    assert!(folder.starts_with("todo_app_"));

    let root = output.path().join(&folder);
    assert_eq!(project_dirs(&output), vec![root.clone()]);
    assert!(fs::read_to_string(root.join("index.html"))
        .unwrap()
        .contains("id=\"todos\""));
    assert_eq!(
        fs::read_to_string(root.join("style.css")).unwrap(),
        "#todos { list-style: none; }"
    );
    assert_eq!(
        fs::read_to_string(root.join("script.js")).unwrap(),
        "const todos = [];"
    );

    assert_eq!(
        handler.written_order(),
        vec!["index.html", "style.css", "script.js"]
    );
    assert!(handler
        .events()
        .iter()
        .any(|e| matches!(e, ProgressEvent::Completed { steps: 3, .. })));

    let task_plan = outcome.state.task_plan.as_ref().unwrap();
    assert_eq!(task_plan.plan.as_ref().unwrap().name, "Todo App");
}

#[tokio::test]
async fn test_coder_runs_n_plus_one_times() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    script_todo_run(&llm);

    let (orchestrator, handler) = orchestrator(llm, &output, 100);
    let outcome = orchestrator.run("Build a todo app").await;

    assert!(outcome.is_success());
    assert_eq!(handler.coder_invocations(), 4);
    assert_eq!(outcome.node_executions, 2 + 4);
    assert_eq!(outcome.state.coder_state.unwrap().current_step_idx, 3);
}

#[tokio::test]
async fn test_planner_failure_creates_no_folder() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_response(MockResponse::text("I would rather chat about the weather."));

    let (orchestrator, handler) = orchestrator(llm.clone(), &output, 100);
    let outcome = orchestrator.run("Build a todo app").await;

    assert!(matches!(
        outcome.error,
        Some(PipelineError::InvalidPlannerResponse(_))
    ));
    assert_eq!(outcome.state.status, RunStatus::Failed);
    assert!(outcome.state.project_folder.is_none());
    assert!(project_dirs(&output).is_empty());
    assert_eq!(llm.request_count(), 1);
    assert!(handler
        .events()
        .iter()
        .any(|e| matches!(e, ProgressEvent::Failed { .. })));
}

#[tokio::test]
async fn test_existing_content_passed_verbatim() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    let first = "<html>\n  <body>\n\t<h1>Hi</h1>\n  </body>\n</html>\n";

    llm.add_response(MockResponse::json(&json!({"name": "Landing"})));
    llm.add_response(MockResponse::json(&json!({
        "implementation_steps": [
            {"filepath": "index.html", "task_description": "Create the page"},
            {"filepath": "index.html", "task_description": "Add a footer"}
        ]
    })));
    llm.add_response(MockResponse::with_tool_calls(
        "",
        vec![MockLLMClient::write_file_call("w1", "index.html", first)],
    ));
    llm.add_response(MockResponse::text("created"));
    llm.add_response(MockResponse::with_tool_calls(
        "",
        vec![MockLLMClient::write_file_call(
            "w2",
            "index.html",
            "<html><footer></footer></html>",
        )],
    ));
    llm.add_response(MockResponse::text("footer added"));

    let (orchestrator, _) = orchestrator(llm.clone(), &output, 100);
    let outcome = orchestrator.run("landing page").await;
    assert!(outcome.is_success(), "{:?}", outcome.error);

    let requests = llm.requests();
    // planner, architect, step 0 (2 turns), step 1 (2 turns)
    assert_eq!(requests.len(), 6);

    let step0_prompt = &requests[2].messages[1].content;
    assert!(step0_prompt.contains(NO_EXISTING_CONTENT));

    let step1_prompt = &requests[4].messages[1].content;
    assert!(step1_prompt.contains(&format!("Existing content:\n{}\n", first)));
    assert!(!step1_prompt.contains(NO_EXISTING_CONTENT));
}

#[tokio::test]
async fn test_recursion_limit_stops_run() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    script_todo_run(&llm);

    // planner + architect + one coder step
    let (orchestrator, _) = orchestrator(llm, &output, 3);
    let outcome = orchestrator.run("Build a todo app").await;

    assert_eq!(outcome.termination(), Termination::RecursionLimit { limit: 3 });
    assert_eq!(outcome.node_executions, 3);
    assert_eq!(outcome.state.status, RunStatus::Failed);

    let root = output
        .path()
        .join(outcome.state.project_folder.as_ref().unwrap());
    assert!(root.join("index.html").exists());
    assert!(!root.join("style.css").exists());
}

#[tokio::test]
async fn test_unwritten_step_does_not_stop_run() {
    let output = TempDir::new().unwrap();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_response(MockResponse::json(&json!({"name": "Notes"})));
    llm.add_response(MockResponse::json(&json!({
        "implementation_steps": [
            {"filepath": "notes.md", "task_description": "Write notes"},
            {"filepath": "todo.md", "task_description": "Write todos"}
        ]
    })));
    llm.add_response(MockResponse::text("I decided not to write anything"));
    llm.add_response(MockResponse::with_tool_calls(
        "",
        vec![MockLLMClient::write_file_call("w", "todo.md", "- [ ] ship")],
    ));
    llm.add_response(MockResponse::text("done"));

    let (orchestrator, handler) = orchestrator(llm, &output, 100);
    let outcome = orchestrator.run("notes").await;

    assert!(outcome.is_success());
    assert_eq!(outcome.state.coder_state.unwrap().unwritten_steps, vec![0]);
    assert!(handler.events().iter().any(|e| matches!(
        e,
        ProgressEvent::StepUnwritten { index: 0, filepath } if filepath == "notes.md"
    )));
}
