//! Ordered, compensable stages.
//!
//! A [`Saga`] threads one data value through a list of steps. Each step
//! consumes the value and returns the next one. When a step fails, every step
//! that already completed is compensated in reverse order and handed the value
//! it produced, so it knows exactly what to undo.

mod audit;
mod builder;
mod error;
mod saga;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::SagaStep;
