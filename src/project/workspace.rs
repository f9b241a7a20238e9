//! The project folder of a single run.
//!
//! Every file access made on behalf of a run goes through a `ProjectWorkspace`,
//! which resolves model-supplied relative paths under the project root and
//! refuses anything that would escape it. Two runs in one process hold two
//! independent workspaces.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::fs::{FileSystem, FileType};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Path is outside the project folder: {0}")]
    PathOutsideProject(String),

    #[error("Path does not exist: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl WorkspaceError {
    fn io(path: &str, err: anyhow::Error) -> Self {
        WorkspaceError::Io {
            path: path.to_string(),
            message: format!("{:#}", err),
        }
    }
}

/// Information about a single path inside the project
#[derive(Debug, Clone, Serialize)]
pub struct PathInfo {
    pub path: String,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub size: u64,
}

#[derive(Clone)]
pub struct ProjectWorkspace {
    folder_name: String,
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl ProjectWorkspace {
    /// Workspace rooted at `output_dir/folder_name`; nothing is created yet
    pub fn new(
        output_dir: impl AsRef<Path>,
        folder_name: impl Into<String>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let folder_name = folder_name.into();
        let root = output_dir.as_ref().join(&folder_name);
        Self {
            folder_name,
            root,
            fs,
        }
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Creates the project root directory
    pub fn create(&self) -> Result<(), WorkspaceError> {
        self.fs
            .create_dir_all(&self.root)
            .map_err(|e| WorkspaceError::io(&self.root.display().to_string(), e))?;
        debug!(root = %self.root.display(), "Project folder created");
        Ok(())
    }

    /// Resolves a project-relative path.
    ///
    /// Leading slashes are ignored, `.` components dropped and `..` applied
    /// lexically; a path that climbs above the root is rejected.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, WorkspaceError> {
        let trimmed = relative.trim().trim_start_matches(['/', '\\']);
        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        warn!(requested_path = relative, "Path traversal attempt detected");
                        return Err(WorkspaceError::PathOutsideProject(relative.to_string()));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WorkspaceError::PathOutsideProject(relative.to_string()));
                }
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }

    /// Path relative to the project root, `/`-separated
    pub fn relative_display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Content of a file, or `None` when it is missing or empty
    pub fn read_existing(&self, relative: &str) -> Result<Option<String>, WorkspaceError> {
        let path = self.resolve(relative)?;
        if !self.fs.is_file(&path) {
            return Ok(None);
        }

        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| WorkspaceError::io(relative, e))?;

        Ok(if content.is_empty() { None } else { Some(content) })
    }

    /// Writes a file, creating intermediate directories; returns bytes written
    pub fn write(&self, relative: &str, content: &str) -> Result<usize, WorkspaceError> {
        let path = self.resolve(relative)?;
        if path == self.root {
            return Err(WorkspaceError::Io {
                path: relative.to_string(),
                message: "cannot write to the project root".to_string(),
            });
        }

        self.fs
            .write(&path, content)
            .map_err(|e| WorkspaceError::io(relative, e))?;

        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(content.len())
    }

    /// Recursively lists files under `relative` (project-relative paths, sorted)
    pub fn list_files(&self, relative: &str) -> Result<Vec<String>, WorkspaceError> {
        let start = self.resolve(relative)?;
        if !self.fs.exists(&start) {
            if start == self.root {
                return Ok(Vec::new());
            }
            return Err(WorkspaceError::NotFound(relative.to_string()));
        }
        if self.fs.is_file(&start) {
            return Ok(vec![self.relative_display(&start)]);
        }

        let mut files = Vec::new();
        let mut pending = vec![start];
        while let Some(dir) = pending.pop() {
            let entries = self
                .fs
                .read_dir(&dir)
                .map_err(|e| WorkspaceError::io(&self.relative_display(&dir), e))?;
            for entry in entries {
                match entry.file_type {
                    FileType::Directory => pending.push(entry.path),
                    _ => files.push(self.relative_display(&entry.path)),
                }
            }
        }
        files.sort();

        Ok(files)
    }

    /// Describes one path
    pub fn describe(&self, relative: &str) -> Result<PathInfo, WorkspaceError> {
        let path = self.resolve(relative)?;
        if !self.fs.exists(&path) {
            return Err(WorkspaceError::NotFound(relative.to_string()));
        }

        let meta = self
            .fs
            .metadata(&path)
            .map_err(|e| WorkspaceError::io(relative, e))?;

        Ok(PathInfo {
            path: self.relative_display(&path),
            file_type: meta.file_type,
            size: meta.size,
        })
    }
}

impl std::fmt::Debug for ProjectWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectWorkspace")
            .field("folder_name", &self.folder_name)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{MockFileSystem, RealFileSystem};
    use tempfile::TempDir;

    fn mock_workspace() -> (ProjectWorkspace, Arc<MockFileSystem>) {
        let fs = Arc::new(MockFileSystem::new());
        let ws = ProjectWorkspace::new("/out", "todo_20240101_000000", fs.clone());
        (ws, fs)
    }

    #[test]
    fn test_root_layout() {
        let (ws, _) = mock_workspace();
        assert_eq!(ws.folder_name(), "todo_20240101_000000");
        assert_eq!(ws.root(), Path::new("/out/todo_20240101_000000"));
    }

    #[test]
    fn test_resolve_normalizes() {
        let (ws, _) = mock_workspace();
        let root = ws.root().to_path_buf();

        assert_eq!(ws.resolve("index.html").unwrap(), root.join("index.html"));
        assert_eq!(ws.resolve("/css/style.css").unwrap(), root.join("css/style.css"));
        assert_eq!(ws.resolve("./js/../app.js").unwrap(), root.join("app.js"));
        assert_eq!(ws.resolve(".").unwrap(), root);
        assert_eq!(ws.resolve("").unwrap(), root);
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let (ws, _) = mock_workspace();
        assert!(matches!(
            ws.resolve("../secrets.txt"),
            Err(WorkspaceError::PathOutsideProject(_))
        ));
        assert!(matches!(
            ws.resolve("css/../../x"),
            Err(WorkspaceError::PathOutsideProject(_))
        ));
    }

    #[test]
    fn test_read_existing_missing_and_empty() {
        let (ws, fs) = mock_workspace();
        assert_eq!(ws.read_existing("index.html").unwrap(), None);

        fs.add_file(ws.root().join("empty.txt"), "");
        assert_eq!(ws.read_existing("empty.txt").unwrap(), None);

        fs.add_file(ws.root().join("index.html"), "<html></html>");
        assert_eq!(
            ws.read_existing("index.html").unwrap().as_deref(),
            Some("<html></html>")
        );
    }

    #[test]
    fn test_write_and_list() {
        let (ws, _) = mock_workspace();
        ws.write("index.html", "<html>").unwrap();
        ws.write("css/style.css", "body{}").unwrap();
        ws.write("js/app/main.js", "1").unwrap();

        assert_eq!(
            ws.list_files(".").unwrap(),
            vec!["css/style.css", "index.html", "js/app/main.js"]
        );
        assert_eq!(ws.list_files("js").unwrap(), vec!["js/app/main.js"]);
        assert!(matches!(
            ws.list_files("missing"),
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_before_creation_is_empty() {
        let (ws, _) = mock_workspace();
        assert!(ws.list_files(".").unwrap().is_empty());
    }

    #[test]
    fn test_write_rejects_root() {
        let (ws, _) = mock_workspace();
        assert!(ws.write(".", "x").is_err());
    }

    #[test]
    fn test_describe() {
        let (ws, _) = mock_workspace();
        ws.write("css/style.css", "body{}").unwrap();

        let info = ws.describe("css/style.css").unwrap();
        assert_eq!(info.path, "css/style.css");
        assert_eq!(info.file_type, FileType::File);
        assert_eq!(info.size, 6);

        assert_eq!(ws.describe("css").unwrap().file_type, FileType::Directory);
        assert!(matches!(ws.describe("nope"), Err(WorkspaceError::NotFound(_))));
    }

    #[test]
    fn test_real_file_system_round_trip() {
        let temp = TempDir::new().unwrap();
        let ws = ProjectWorkspace::new(temp.path(), "app_20240101_000000", Arc::new(RealFileSystem));
        ws.create().unwrap();
        assert!(ws.root().is_dir());

        ws.write("src/index.html", "<p>hi</p>").unwrap();
        assert_eq!(
            std::fs::read_to_string(ws.root().join("src/index.html")).unwrap(),
            "<p>hi</p>"
        );
        assert_eq!(ws.list_files(".").unwrap(), vec!["src/index.html"]);
    }
}
