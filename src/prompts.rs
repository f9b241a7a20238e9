//! Prompts for the planner, architect and coder stages

/// Marker placed in the coder task prompt when the target file has no content yet
pub const NO_EXISTING_CONTENT: &str = "(no existing content: this file does not exist yet)";

pub fn planner_prompt(user_prompt: &str) -> String {
    format!(
        r#"You are the PLANNER agent. Convert the user prompt into a COMPLETE engineering project plan.

Describe:
- a short, descriptive project name
- a one-paragraph description
- the tech stack (languages, frameworks, libraries)
- the user-facing features, most important first
- every file the project needs, as paths relative to the project root

Keep the project self-contained: no build step is available, and every file you
list will be written by a coding agent one at a time.

User request:
{user_prompt}"#
    )
}

pub fn architect_prompt(plan_json: &str) -> String {
    format!(
        r#"You are the ARCHITECT agent. Given this project plan, break it down into explicit engineering tasks.

RULES:
- Create exactly one IMPLEMENTATION TASK per file in the plan; add files the plan forgot if the project cannot work without them.
- In each task description:
    * Specify exactly what to implement.
    * Name the variables, functions, classes and components to be defined.
    * Mention how this task depends on or will be used by previous tasks.
    * Include integration details: imports, expected function signatures, data flow.
- Order tasks so that dependencies are implemented first.
- Each step must be SELF-CONTAINED but also carry FORWARD the relevant context from earlier tasks.
- File paths are relative to the project root.

Project plan:
{plan_json}"#
    )
}

pub const CODER_SYSTEM_PROMPT: &str = r#"You are the CODER agent. You are implementing one specific engineering task in a project folder.

You have access to tools to read and write files:
- read_file(path): read a file in the project (empty result if it does not exist)
- write_file(path, content): create or overwrite a file, creating directories as needed
- list_files(path): list every file under a directory of the project
- list_file(path): details about a single file or directory
- get_current_directory(): the project root

Always:
- Review all existing files to maintain compatibility.
- Implement the FULL file content, integrating with other modules.
- Maintain consistent naming of variables, functions and imports.
- When a module is imported from another file, make sure it exists and is implemented as described.
- Save your work with write_file using the exact path of the task. Paths are relative to the project root.

When the file is written, reply with a short summary of what you implemented and do not call any more tools."#;

pub fn coder_system_prompt() -> &'static str {
    CODER_SYSTEM_PROMPT
}

/// User prompt for one coder step.
///
/// `existing_content` is included verbatim; `None` becomes the
/// [`NO_EXISTING_CONTENT`] marker.
pub fn compose_task_prompt(
    task_description: &str,
    filepath: &str,
    existing_content: Option<&str>,
) -> String {
    let existing = existing_content.unwrap_or(NO_EXISTING_CONTENT);
    format!(
        "Task: {task_description}\n\
         File: {filepath}\n\
         Existing content:\n{existing}\n\
         Use write_file(path, content) to save your changes."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_prompt_embeds_request() {
        let prompt = planner_prompt("Build a todo app");
        assert!(prompt.contains("PLANNER"));
        assert!(prompt.ends_with("Build a todo app"));
    }

    #[test]
    fn test_architect_prompt_embeds_plan() {
        let prompt = architect_prompt(r#"{"name":"Todo"}"#);
        assert!(prompt.contains("ARCHITECT"));
        assert!(prompt.contains(r#"{"name":"Todo"}"#));
    }

    #[test]
    fn test_task_prompt_with_existing_content_is_verbatim() {
        let existing = "  <html>\n\t<body></body>\n</html>\n";
        let prompt = compose_task_prompt("Add a header", "index.html", Some(existing));

        assert!(prompt.starts_with("Task: Add a header\nFile: index.html\n"));
        assert!(prompt.contains(&format!("Existing content:\n{}\n", existing)));
        assert!(!prompt.contains(NO_EXISTING_CONTENT));
    }

    #[test]
    fn test_task_prompt_without_existing_content_has_marker() {
        let prompt = compose_task_prompt("Create styles", "css/style.css", None);
        assert!(prompt.contains(&format!("Existing content:\n{}\n", NO_EXISTING_CONTENT)));
        assert!(prompt.ends_with("Use write_file(path, content) to save your changes."));
    }

    #[test]
    fn test_coder_system_prompt_lists_tools() {
        for tool in [
            "read_file",
            "write_file",
            "list_files",
            "list_file",
            "get_current_directory",
        ] {
            assert!(coder_system_prompt().contains(tool), "missing {}", tool);
        }
    }
}
