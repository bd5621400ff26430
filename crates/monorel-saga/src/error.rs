use std::fmt::Debug;

use thiserror::Error;

/// A compensation that failed while rolling back.
#[derive(Debug, Error)]
#[error("compensation failed for step '{step}': {description}")]
pub struct CompensationError<E> {
    pub step: String,
    pub description: String,
    #[source]
    pub error: E,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step failed and every compensation succeeded.
    #[error("step '{step}' failed")]
    StepFailed {
        step: String,
        #[source]
        source: E,
    },

    /// A step failed and at least one compensation failed too.
    #[error("step '{failed_step}' failed, and {} compensation(s) also failed", compensation_errors.len())]
    CompensationFailed {
        failed_step: String,
        step_error: E,
        compensation_errors: Vec<CompensationError<E>>,
    },
}

impl<E: Debug> SagaError<E> {
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
            Self::CompensationFailed { failed_step, .. } => failed_step,
        }
    }

    #[must_use]
    pub fn step_error(&self) -> &E {
        match self {
            Self::StepFailed { source, .. } => source,
            Self::CompensationFailed { step_error, .. } => step_error,
        }
    }
}
