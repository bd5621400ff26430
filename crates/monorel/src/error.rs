use monorel_operations::OperationError;
use monorel_operations::operations::ReleaseFailure;
use monorel_saga::SagaAuditLog;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("interactive mode requires a terminal; use `monorel ci <bump>` instead")]
    NotATty,

    #[error("release aborted")]
    Release {
        #[source]
        source: OperationError,
        audit: Option<SagaAuditLog>,
    },
}

impl From<ReleaseFailure> for CliError {
    fn from(failure: ReleaseFailure) -> Self {
        Self::Release {
            source: failure.error,
            audit: failure.audit,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
