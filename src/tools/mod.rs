//! File tools the coder agent calls, confined to the project workspace

pub mod error;
pub mod implementations;
pub mod registry;
pub mod system;
pub mod trait_def;

pub use error::ToolError;
pub use implementations::WrittenFiles;
pub use registry::ToolRegistry;
pub use system::ToolSystem;
pub use trait_def::Tool;
