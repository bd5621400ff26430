use std::fmt;
use std::path::Path;

use crate::Result;

/// The per-package commands run before anything is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Test,
    Build,
}

impl Task {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Build => "build",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a command that could be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub success: bool,
    /// Combined stdout and stderr.
    pub output: String,
}

impl TaskOutcome {
    #[must_use]
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    #[must_use]
    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

pub trait TaskRunner: Send + Sync {
    /// Runs `command` inside `package_dir`.
    ///
    /// A command that runs and exits unsuccessfully is an `Ok` outcome with
    /// `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is empty or cannot be started.
    fn run(&self, task: Task, command: &[String], package_dir: &Path) -> Result<TaskOutcome>;
}
