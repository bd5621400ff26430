use std::path::Path;

use monorel_core::PreReleaseChannel;

use crate::Result;

pub trait Publisher: Send + Sync {
    /// Publishes the workspace once, using `dist_tag` as the registry
    /// distribution tag when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the publish command fails.
    fn publish(
        &self,
        workspace_root: &Path,
        command: &[String],
        dist_tag: Option<PreReleaseChannel>,
    ) -> Result<()>;
}
