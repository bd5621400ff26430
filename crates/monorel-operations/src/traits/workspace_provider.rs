use std::path::Path;

use monorel_workspace::Workspace;

use crate::Result;

pub trait WorkspaceProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no workspace can be found from the given path or
    /// its manifests cannot be read.
    fn discover_workspace(&self, start_path: &Path) -> Result<Workspace>;
}
