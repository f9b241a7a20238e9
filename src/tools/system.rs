use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::error::ToolError;
use super::implementations::WrittenFiles;
use super::registry::ToolRegistry;
use crate::llm::ToolDefinition;
use crate::project::ProjectWorkspace;

/// Executes tool calls against one project workspace.
///
/// Results are not cached: a `write_file` invalidates any earlier read.
pub struct ToolSystem {
    registry: ToolRegistry,
    workspace: ProjectWorkspace,
    written: WrittenFiles,
}

impl ToolSystem {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        let written = WrittenFiles::default();
        Self {
            registry: ToolRegistry::new(workspace.clone(), written.clone()),
            workspace,
            written,
        }
    }

    /// Executes a tool and returns its structured JSON result
    pub async fn execute(&self, tool_name: &str, arguments: Value) -> Result<Value, ToolError> {
        info!(tool = tool_name, args = ?arguments, "Executing tool");

        let tool = self
            .registry
            .get_tool(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        let result = tool.execute(arguments).await;

        match &result {
            Ok(output) => {
                let output_preview = serde_json::to_string(output).unwrap_or_default();
                let preview: String = output_preview.chars().take(200).collect();
                info!(tool = tool_name, "Tool execution completed");
                debug!(tool = tool_name, output_preview = %preview, "Tool output preview");
            }
            Err(e) => {
                warn!(tool = tool_name, error = %e, recoverable = e.is_recoverable(), "Tool execution failed");
            }
        }

        result
    }

    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.as_tool_definitions()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.registry.tool_names()
    }

    pub fn tool_count(&self) -> usize {
        self.registry.len()
    }

    pub fn workspace(&self) -> &ProjectWorkspace {
        &self.workspace
    }

    /// Project-relative paths written through `write_file` so far
    pub fn written_files(&self) -> BTreeSet<String> {
        self.written.lock().unwrap().clone()
    }

    /// Whether `path` (in any spelling that resolves to the same file) was written
    pub fn has_written(&self, path: &str) -> bool {
        match self.workspace.resolve(path) {
            Ok(resolved) => {
                let relative = self.workspace.relative_display(&resolved);
                self.written.lock().unwrap().contains(&relative)
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_project() -> (TempDir, ToolSystem) {
        let dir = TempDir::new().unwrap();
        let ws = ProjectWorkspace::new(dir.path(), "todo_app", Arc::new(RealFileSystem));
        ws.create().unwrap();

        fs::create_dir(ws.root().join("css")).unwrap();
        fs::write(ws.root().join("index.html"), "<html></html>").unwrap();
        fs::write(ws.root().join("css/style.css"), "body {}").unwrap();

        let system = ToolSystem::new(ws);
        (dir, system)
    }

    #[tokio::test]
    async fn test_tool_system_creation() {
        let (_dir, system) = create_test_project();
        assert_eq!(system.tool_count(), 5);
        assert!(system.written_files().is_empty());
    }

    #[tokio::test]
    async fn test_execute_list_files() {
        let (_dir, system) = create_test_project();

        let result = system.execute("list_files", json!({"path": "."})).await.unwrap();
        assert_eq!(result["files"], json!(["css/style.css", "index.html"]));
    }

    #[tokio::test]
    async fn test_read_after_write_sees_new_content() {
        let (_dir, system) = create_test_project();

        let before = system
            .execute("read_file", json!({"path": "index.html"}))
            .await
            .unwrap();
        assert_eq!(before["content"], "<html></html>");

        system
            .execute(
                "write_file",
                json!({"path": "index.html", "content": "<!doctype html>"}),
            )
            .await
            .unwrap();

        let after = system
            .execute("read_file", json!({"path": "index.html"}))
            .await
            .unwrap();
        assert_eq!(after["content"], "<!doctype html>");
    }

    #[tokio::test]
    async fn test_write_tracking() {
        let (_dir, system) = create_test_project();

        system
            .execute("write_file", json!({"path": "js/app.js", "content": "1"}))
            .await
            .unwrap();

        assert!(system.has_written("js/app.js"));
        assert!(system.has_written("/js/app.js"));
        assert!(system.has_written("./js/../js/app.js"));
        assert!(!system.has_written("index.html"));
        assert!(!system.has_written("../outside"));
        assert_eq!(system.written_files().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (_dir, system) = create_test_project();

        let err = system.execute("delete_file", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "delete_file"));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_get_current_directory_is_project_root() {
        let (_dir, system) = create_test_project();

        let result = system.execute("get_current_directory", json!({})).await.unwrap();
        assert_eq!(
            result["path"],
            json!(system.workspace().root().display().to_string())
        );
    }
}
