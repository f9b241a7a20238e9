use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::error::ToolError;
use super::trait_def::Tool;
use crate::project::ProjectWorkspace;

/// Project-relative paths written during a step, shared with `WriteFileTool`
pub type WrittenFiles = Arc<Mutex<BTreeSet<String>>>;

fn required_str<'a>(tool: &'static str, args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::invalid_arguments(tool, format!("missing '{}' parameter", key)))
}

fn optional_path(args: &Value) -> &str {
    args.get("path").and_then(Value::as_str).unwrap_or(".")
}

pub struct ReadFileTool {
    workspace: ProjectWorkspace,
}

impl ReadFileTool {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str {
        "read_file"
    }

    fn description(&self) -> &'static str {
        "Read the content of a file in the project. Returns empty content if the file does not exist."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path relative to the project root (e.g., 'index.html', 'css/style.css')"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let path = required_str(self.name(), &args, "path")?;
        debug!(path, "read_file parameters");

        let resolved = self.workspace.resolve(path)?;
        if self.workspace.file_system().is_dir(&resolved) {
            return Err(ToolError::invalid_arguments(
                self.name(),
                format!("{} is a directory", path),
            ));
        }

        let content = self.workspace.read_existing(path)?;
        debug!(path, exists = content.is_some(), "read_file completed");

        Ok(json!({
            "path": self.workspace.relative_display(&resolved),
            "exists": content.is_some(),
            "content": content.unwrap_or_default(),
        }))
    }
}

pub struct WriteFileTool {
    workspace: ProjectWorkspace,
    written: WrittenFiles,
}

impl WriteFileTool {
    pub fn new(workspace: ProjectWorkspace, written: WrittenFiles) -> Self {
        Self { workspace, written }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str {
        "write_file"
    }

    fn description(&self) -> &'static str {
        "Write the full content of a file in the project, replacing it if it exists and creating directories as needed"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File path relative to the project root"
                },
                "content": {
                    "type": "string",
                    "description": "Complete new content of the file"
                }
            },
            "required": ["path", "content"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let path = required_str(self.name(), &args, "path")?;
        let content = required_str(self.name(), &args, "content")?;

        let resolved = self.workspace.resolve(path)?;
        let bytes_written = self.workspace.write(path, content)?;
        let relative = self.workspace.relative_display(&resolved);

        info!(path = %relative, bytes_written, "File written by agent");
        self.written.lock().unwrap().insert(relative.clone());

        Ok(json!({
            "path": relative,
            "bytes_written": bytes_written,
        }))
    }
}

pub struct ListFilesTool {
    workspace: ProjectWorkspace,
}

impl ListFilesTool {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &'static str {
        "list_files"
    }

    fn description(&self) -> &'static str {
        "Recursively list all files under a directory of the project"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory relative to the project root. Defaults to '.' (the root)."
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let path = optional_path(&args);
        let files = self.workspace.list_files(path)?;
        debug!(path, files_found = files.len(), "list_files completed");

        Ok(json!({
            "path": path,
            "files": files,
        }))
    }
}

pub struct ListFileTool {
    workspace: ProjectWorkspace,
}

impl ListFileTool {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ListFileTool {
    fn name(&self) -> &'static str {
        "list_file"
    }

    fn description(&self) -> &'static str {
        "Show the type and size of a single file or directory in the project"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path relative to the project root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let path = required_str(self.name(), &args, "path")?;
        let info = self.workspace.describe(path)?;

        serde_json::to_value(&info).map_err(|e| ToolError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

pub struct GetCurrentDirectoryTool {
    workspace: ProjectWorkspace,
}

impl GetCurrentDirectoryTool {
    pub fn new(workspace: ProjectWorkspace) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for GetCurrentDirectoryTool {
    fn name(&self) -> &'static str {
        "get_current_directory"
    }

    fn description(&self) -> &'static str {
        "Return the root directory of the project; all tool paths are relative to it"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
        Ok(json!({
            "path": self.workspace.root().display().to_string(),
        }))
    }
}
