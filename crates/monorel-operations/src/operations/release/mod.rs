mod context;
mod operation;
mod saga_data;
mod saga_steps;

pub use context::ReleaseSagaContext;
pub use operation::{PublishStatus, ReleaseFailure, ReleaseOperation, ReleaseOutcome};
pub use saga_data::ReleaseSagaData;
pub use saga_steps::FALLBACK_COMMIT_MESSAGE;
