use std::path::Path;

use monorel_git::{CommitInfo, TagInfo};

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or status check fails.
    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo>;

    /// # Errors
    ///
    /// Returns an error if the tag does not exist or cannot be deleted.
    fn delete_tag(&self, project_root: &Path, tag_name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the push is rejected or `git` cannot be run.
    fn push_tag(&self, project_root: &Path, remote: &str, tag_name: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    fn stage_all(&self, project_root: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo>;
}
