use crate::Result;

use super::Repository;

impl Repository {
    /// Untracked files count as changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true),
        ))?;

        Ok(statuses.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use std::fs;

    #[test]
    fn clean_working_tree() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        assert!(repo.is_working_tree_clean()?);
        Ok(())
    }

    #[test]
    fn untracked_file_makes_tree_dirty() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;
        fs::create_dir_all(dir.path().join("packages/a"))?;
        fs::write(dir.path().join("packages/a/package.json"), "{}")?;

        assert!(!repo.is_working_tree_clean()?);
        Ok(())
    }
}
