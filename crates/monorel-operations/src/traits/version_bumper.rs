use std::path::Path;

use monorel_core::{BumpKind, PreReleaseChannel, ReleaseInfo};

use crate::Result;

pub trait VersionBumper: Send + Sync {
    /// Bumps the `package.json` inside `dir` and returns the new version.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest has no valid version or cannot be
    /// rewritten.
    fn bump(
        &self,
        dir: &Path,
        kind: BumpKind,
        channel: Option<PreReleaseChannel>,
    ) -> Result<ReleaseInfo>;
}
