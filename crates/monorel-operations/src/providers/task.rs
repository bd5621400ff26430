use std::path::Path;

use tracing::debug;

use super::command::{combined_output, run_captured};
use crate::Result;
use crate::traits::{Task, TaskOutcome, TaskRunner};

/// Runs test and build commands as child processes.
pub struct ShellTaskRunner;

impl ShellTaskRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellTaskRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRunner for ShellTaskRunner {
    fn run(&self, task: Task, command: &[String], package_dir: &Path) -> Result<TaskOutcome> {
        debug!(%task, dir = %package_dir.display(), command = %command.join(" "), "running task");

        let output = run_captured(command, package_dir)?;

        Ok(TaskOutcome {
            success: output.status.success(),
            output: combined_output(&output),
        })
    }
}
