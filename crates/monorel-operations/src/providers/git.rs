use std::path::Path;

use monorel_git::{CommitInfo, Repository, TagInfo};

use crate::Result;
use crate::traits::GitProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool> {
        Ok(monorel_git::is_working_tree_clean(project_root)?)
    }

    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.create_tag(tag_name, message)?)
    }

    fn delete_tag(&self, project_root: &Path, tag_name: &str) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.delete_tag(tag_name)?)
    }

    fn push_tag(&self, project_root: &Path, remote: &str, tag_name: &str) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.push_tag(remote, tag_name)?)
    }

    fn stage_all(&self, project_root: &Path) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.stage_all()?)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.commit(message)?)
    }
}
