mod plan;
mod release;
mod tag;

pub use plan::PlanBuilder;
pub use release::{
    FALLBACK_COMMIT_MESSAGE, PublishStatus, ReleaseFailure, ReleaseOperation, ReleaseOutcome,
    ReleaseSagaContext, ReleaseSagaData,
};
pub use tag::{TagResolver, release_message};
