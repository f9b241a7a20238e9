//! Tool registry
//!
//! Holds the file tools bound to one project workspace and exposes them to
//! the model as tool definitions.

use std::sync::Arc;

use super::implementations::*;
use super::trait_def::Tool;
use crate::llm::ToolDefinition;
use crate::project::ProjectWorkspace;

pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Standard coder tools for `workspace`; writes are recorded in `written`
    pub fn new(workspace: ProjectWorkspace, written: WrittenFiles) -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(ReadFileTool::new(workspace.clone())),
            Arc::new(WriteFileTool::new(workspace.clone(), written)),
            Arc::new(ListFilesTool::new(workspace.clone())),
            Arc::new(ListFileTool::new(workspace.clone())),
            Arc::new(GetCurrentDirectoryTool::new(workspace)),
        ];

        Self { tools }
    }

    pub fn as_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.schema(),
            })
            .collect()
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
