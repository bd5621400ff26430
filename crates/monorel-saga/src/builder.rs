use crate::saga::{BoxedStep, Saga};
use crate::step::SagaStep;

/// Collects steps in execution order.
pub struct SagaBuilder<Ctx, D, E> {
    steps: Vec<BoxedStep<Ctx, D, E>>,
}

impl<Ctx, D, E> SagaBuilder<Ctx, D, E> {
    #[must_use]
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    #[must_use]
    pub fn step<S>(mut self, step: S) -> Self
    where
        S: SagaStep<Ctx, Data = D, Error = E> + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    #[must_use]
    pub fn build(self) -> Saga<Ctx, D, E> {
        Saga::from_steps(self.steps)
    }
}

impl<Ctx, D, E> Default for SagaBuilder<Ctx, D, E> {
    fn default() -> Self {
        Self::new()
    }
}
