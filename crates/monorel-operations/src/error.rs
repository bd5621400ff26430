use std::path::PathBuf;

use monorel_saga::SagaError;
use thiserror::Error;

use crate::traits::Task;

/// Details about a failed compensation during saga rollback.
#[derive(Debug)]
pub struct CompensationFailure {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The error that occurred during compensation.
    pub error: Box<OperationError>,
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Core(#[from] monorel_core::CoreError),

    #[error(transparent)]
    Workspace(#[from] monorel_workspace::WorkspaceError),

    #[error(transparent)]
    Git(#[from] monorel_git::GitError),

    #[error(transparent)]
    Manifest(#[from] monorel_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] monorel_changelog::ChangelogError),

    #[error("version calculation failed")]
    Version(#[from] monorel_version::VersionError),

    #[error("no packages found in workspace at '{0}'")]
    NoPackages(PathBuf),

    #[error("no packages selected")]
    NoPackagesSelected,

    #[error("unknown package '{name}' (available: {available})")]
    UnknownPackage { name: String, available: String },

    #[error("no bump kind selected")]
    MissingBumpKind,

    #[error("bump kind '{kind}' requires a pre-release channel")]
    MissingChannel { kind: monorel_core::BumpKind },

    #[error("tag version prompt cancelled")]
    TagPromptCancelled,

    #[error("tag version cannot be empty")]
    EmptyTagVersion,

    #[error("release cancelled")]
    Cancelled,

    #[error("working tree has uncommitted changes; commit or stash them first")]
    DirtyWorkingTree,

    #[error("prompt failed")]
    Prompt(#[source] std::io::Error),

    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to run `{command}` in '{dir}'")]
    CommandSpawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{task} failed for package '{package}'{}",
        if others.is_empty() { String::new() } else { format!(" (also failed: {})", others.join(", ")) }
    )]
    TaskFailed {
        task: Task,
        package: String,
        output: String,
        /// Further packages whose task failed in the same stage.
        others: Vec<String>,
    },

    #[error("`{command}` failed")]
    PublishFailed { command: String, output: String },

    #[error("stage '{stage}' produced no result")]
    MissingStageOutput { stage: &'static str },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("release failed at stage '{step}'")]
    SagaFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error(
        "release failed at stage '{step}' and {} compensation(s) also failed", compensation_failures.len()
    )]
    SagaCompensationFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        compensation_failures: Vec<CompensationFailure>,
    },
}

impl OperationError {
    /// Output captured from the external command behind this error, if any.
    #[must_use]
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            Self::TaskFailed { output, .. } | Self::PublishFailed { output, .. } => Some(output),
            Self::Git(monorel_git::GitError::PushFailed { output, .. }) => Some(output),
            Self::SagaFailed { source, .. } | Self::SagaCompensationFailed { source, .. } => {
                source.captured_output()
            }
            _ => None,
        }
    }

    /// Whether the error stems from user input rather than a failing collaborator.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::NoPackages(_)
            | Self::NoPackagesSelected
            | Self::UnknownPackage { .. }
            | Self::MissingBumpKind
            | Self::MissingChannel { .. }
            | Self::TagPromptCancelled
            | Self::EmptyTagVersion
            | Self::Cancelled
            | Self::DirtyWorkingTree
            | Self::Core(_) => true,
            Self::SagaFailed { source, .. } | Self::SagaCompensationFailed { source, .. } => {
                source.is_input_error()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        match err {
            SagaError::StepFailed { step, source } => Self::SagaFailed {
                step,
                source: Box::new(source),
            },
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation_errors,
            } => {
                let compensation_failures = compensation_errors
                    .into_iter()
                    .map(|e| CompensationFailure {
                        step: e.step,
                        description: e.description,
                        error: Box::new(e.error),
                    })
                    .collect();
                Self::SagaCompensationFailed {
                    step: failed_step,
                    source: Box::new(step_error),
                    compensation_failures,
                }
            }
            _ => Self::SagaFailed {
                step: "unknown".to_string(),
                source: Box::new(Self::Cancelled),
            },
        }
    }
}
