pub mod error;
mod plan;
pub mod types;

pub use error::*;
pub use plan::ReleasePlan;
pub use types::*;
