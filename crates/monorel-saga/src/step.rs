/// One stage of a saga.
///
/// `Ctx` carries shared collaborators and is never passed between steps.
pub trait SagaStep<Ctx>: Send + Sync {
    /// Value threaded through the saga.
    type Data: Clone + Send + 'static;

    type Error;

    /// Name used in logs, audit records and errors.
    fn name(&self) -> &'static str;

    /// Whether the step takes part in this run. Skipped steps are recorded in
    /// the audit log and never compensated.
    fn should_run(&self, ctx: &Ctx, data: &Self::Data) -> bool {
        let _ = (ctx, data);
        true
    }

    /// # Errors
    ///
    /// Returns an error if the step fails; earlier steps are then compensated.
    fn execute(&self, ctx: &Ctx, data: Self::Data) -> Result<Self::Data, Self::Error>;

    /// Undo the step's effects.
    ///
    /// Receives the value this step returned from `execute`. The default is a
    /// no-op, suitable for read-only steps.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails.
    fn compensate(&self, ctx: &Ctx, output: &Self::Data) -> Result<(), Self::Error> {
        let _ = (ctx, output);
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
