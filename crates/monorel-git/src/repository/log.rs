use std::path::Path;

use git2::{DiffOptions, Sort};

use crate::{CommitSummary, Result};

use super::Repository;

impl Repository {
    /// Commits reachable from `HEAD` that change something under `path`,
    /// newest first.
    ///
    /// With `since_tag`, commits reachable from that tag are excluded. A path
    /// equal to the repository root matches every commit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GitError::RefNotFound`] if `since_tag` does not exist,
    /// or an error if history cannot be walked.
    pub fn commits_touching(
        &self,
        path: &Path,
        since_tag: Option<&str>,
    ) -> Result<Vec<CommitSummary>> {
        let pathspec = pathspec_for(&self.workdir_relative(path));

        let mut walk = self.inner.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push_head()?;
        if let Some(tag) = since_tag {
            walk.hide(self.tag_target(tag)?)?;
        }

        let mut commits = Vec::new();
        for oid in walk {
            let commit = self.inner.find_commit(oid?)?;
            if self.commit_touches(&commit, pathspec.as_deref())? {
                commits.push(CommitSummary::from_message(
                    commit.id().to_string(),
                    commit.message().unwrap_or_default(),
                ));
            }
        }

        Ok(commits)
    }

    fn commit_touches(&self, commit: &git2::Commit<'_>, pathspec: Option<&str>) -> Result<bool> {
        let Some(pathspec) = pathspec else {
            return Ok(true);
        };

        let tree = commit.tree()?;
        let parent_tree = match commit.parents().next() {
            Some(parent) => Some(parent.tree()?),
            None => None,
        };

        let mut options = DiffOptions::new();
        options.pathspec(pathspec);
        let diff =
            self.inner
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut options))?;

        Ok(diff.deltas().next().is_some())
    }
}

/// `None` for the repository root.
fn pathspec_for(relative: &Path) -> Option<String> {
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use super::*;
    use std::fs;

    fn commit_file(
        repo: &Repository,
        root: &Path,
        file: &str,
        message: &str,
    ) -> anyhow::Result<()> {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, message)?;
        repo.stage_all()?;
        repo.commit(message)?;
        Ok(())
    }

    #[test]
    fn filters_by_package_directory() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        commit_file(&repo, dir.path(), "packages/a/index.js", "feat(a): first")?;
        commit_file(&repo, dir.path(), "packages/b/index.js", "fix(b): other")?;
        commit_file(&repo, dir.path(), "packages/a/util.js", "fix(a): second")?;
        commit_file(&repo, dir.path(), "packages/ab/x.js", "chore: sibling prefix")?;

        let commits = repo.commits_touching(&dir.path().join("packages/a"), None)?;

        let subjects: Vec<_> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["fix(a): second", "feat(a): first"]);
        Ok(())
    }

    #[test]
    fn stops_at_previous_tag() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        commit_file(&repo, dir.path(), "packages/a/index.js", "feat: old")?;
        repo.create_tag("a@1.0.0", "release: a@1.0.0")?;
        commit_file(&repo, dir.path(), "packages/a/index.js", "feat: new")?;

        let commits = repo.commits_touching(&dir.path().join("packages/a"), Some("a@1.0.0"))?;

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "feat: new");
        Ok(())
    }

    #[test]
    fn root_path_matches_every_commit() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        commit_file(&repo, dir.path(), "README.md", "docs: readme")?;

        let commits = repo.commits_touching(dir.path(), None)?;

        assert_eq!(commits.len(), 2);
        Ok(())
    }

    #[test]
    fn unknown_tag_is_an_error() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        let result = repo.commits_touching(dir.path(), Some("nope"));

        assert!(matches!(result, Err(crate::GitError::RefNotFound { .. })));
        Ok(())
    }

    #[test]
    fn pathspec_uses_forward_slashes() {
        assert_eq!(
            pathspec_for(Path::new("packages/a")).as_deref(),
            Some("packages/a")
        );
        assert_eq!(pathspec_for(Path::new("")), None);
    }
}
