//! Per-run project folder: naming and path resolution

pub mod naming;
pub mod workspace;

pub use naming::{
    project_folder_name, project_folder_name_now, sanitize_folder_name, FOLDER_TIMESTAMP_FORMAT,
};
pub use workspace::{ProjectWorkspace, WorkspaceError};
