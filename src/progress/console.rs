//! Human-facing status banners

use super::{LoggingHandler, ProgressEvent, ProgressHandler};
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

const RULE_WIDTH: usize = 60;

/// Prints run milestones as console banners and logs every event
pub struct ConsoleHandler {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    /// Banners on stderr, leaving stdout to machine-readable output
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn banner(event: &ProgressEvent) -> Option<String> {
        let rule = "=".repeat(RULE_WIDTH);
        match event {
            ProgressEvent::ProjectCreated { name, folder, .. } => Some(format!(
                "\n{rule}\nCreating project: {name}\nProject folder: {folder}\n{rule}\n"
            )),
            ProgressEvent::TaskPlanReady { filepaths } => {
                let mut text = format!("\nImplementation plan:\nTotal steps: {}\n", filepaths.len());
                for (i, path) in filepaths.iter().enumerate() {
                    text.push_str(&format!("  {}. {}\n", i + 1, path));
                }
                Some(text)
            }
            ProgressEvent::StepStarted {
                index,
                total,
                filepath,
            } => Some(format!("\nStep {}/{}: {}", index + 1, total, filepath)),
            ProgressEvent::StepUnwritten { index, filepath } => Some(format!(
                "Warning: step {} finished without writing {}",
                index + 1,
                filepath
            )),
            ProgressEvent::Completed { project_root, .. } => Some(format!(
                "\n{rule}\nProject completed successfully!\nLocation: {}\n{rule}\n",
                project_root.display()
            )),
            ProgressEvent::Failed { error } => Some(format!("\nRun failed: {}\n", error)),
            _ => None,
        }
    }
}

impl ProgressHandler for ConsoleHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        LoggingHandler.on_progress(event);

        if let Some(text) = Self::banner(event) {
            let mut out = self.out.lock().unwrap();
            if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
                debug!(error = %e, "Failed to write console banner");
            }
        }
    }
}
