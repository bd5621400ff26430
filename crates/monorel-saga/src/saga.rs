use std::fmt::Debug;

use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::error::{CompensationError, SagaError};
use crate::step::SagaStep;

pub(crate) type BoxedStep<Ctx, D, E> = Box<dyn SagaStep<Ctx, Data = D, Error = E>>;

/// A built saga ready for execution.
///
/// Each executed step's output becomes the next step's input. If a step
/// fails, completed steps are compensated in reverse order (LIFO), each with
/// the output it produced. Skipped steps are neither executed nor
/// compensated.
pub struct Saga<Ctx, D, E> {
    steps: Vec<BoxedStep<Ctx, D, E>>,
}

impl<Ctx, D, E> Saga<Ctx, D, E> {
    pub(crate) fn from_steps(steps: Vec<BoxedStep<Ctx, D, E>>) -> Self {
        Self { steps }
    }
}

impl<Ctx, D, E> Saga<Ctx, D, E>
where
    D: Clone + Send + 'static,
    E: Debug,
{
    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// # Errors
    ///
    /// Returns [`SagaError::StepFailed`] if a step fails and every compensation
    /// succeeds, [`SagaError::CompensationFailed`] if some compensation fails
    /// as well.
    pub fn execute(&self, ctx: &Ctx, input: D) -> Result<D, SagaError<E>> {
        self.execute_with_audit(ctx, input).0
    }

    /// Like [`Saga::execute`], also returning the audit log of the run.
    pub fn execute_with_audit(&self, ctx: &Ctx, input: D) -> (Result<D, SagaError<E>>, SagaAuditLog) {
        let mut audit = SagaAuditLog::new();
        // (step index, audit index, step output)
        let mut completed: Vec<(usize, usize, D)> = Vec::new();
        let mut data = input;

        for (index, step) in self.steps.iter().enumerate() {
            if !step.should_run(ctx, &data) {
                debug!(step = step.name(), "skipping saga step");
                audit.record_skipped(step.name());
                continue;
            }

            debug!(step = step.name(), "executing saga step");
            let record = audit.record_start(step.name());

            match step.execute(ctx, data) {
                Ok(output) => {
                    audit.record_success(record, step.compensation_description());
                    completed.push((index, record, output.clone()));
                    data = output;
                }
                Err(error) => {
                    warn!(step = step.name(), ?error, "saga step failed");
                    audit.record_failure(record);
                    let saga_error =
                        self.compensate(ctx, &mut audit, completed, step.name(), error);
                    return (Err(saga_error), audit);
                }
            }
        }

        (Ok(data), audit)
    }

    fn compensate(
        &self,
        ctx: &Ctx,
        audit: &mut SagaAuditLog,
        mut completed: Vec<(usize, usize, D)>,
        failed_step: &str,
        step_error: E,
    ) -> SagaError<E> {
        let mut compensation_errors = Vec::new();

        while let Some((index, record, output)) = completed.pop() {
            let step = &self.steps[index];
            let description = step.compensation_description();
            debug!(step = step.name(), %description, "compensating saga step");

            match step.compensate(ctx, &output) {
                Ok(()) => audit.record_compensated(record),
                Err(error) => {
                    warn!(step = step.name(), ?error, "compensation failed");
                    audit.record_compensation_failed(record);
                    compensation_errors.push(CompensationError {
                        step: step.name().to_string(),
                        description,
                        error,
                    });
                }
            }
        }

        if compensation_errors.is_empty() {
            SagaError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}
