//! Release pipeline for pnpm/npm workspaces.
//!
//! Collaborators (test and build runners, version bumping, changelogs, git,
//! publishing, prompts) are traits in [`traits`] with file-system and shell
//! implementations in [`providers`]. [`operations::ReleaseOperation`] wires
//! them into the staged release.

mod error;
pub mod operations;
pub mod providers;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use error::{CompensationFailure, OperationError, Result};
