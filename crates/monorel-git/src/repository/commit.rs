use tracing::debug;

use crate::{CommitInfo, Result};

use super::Repository;

impl Repository {
    /// Commit the current index on top of `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    pub fn commit(&self, message: &str) -> Result<CommitInfo> {
        let signature = self.inner.signature()?;
        let tree = {
            let mut index = self.inner.index()?;
            self.inner.find_tree(index.write_tree()?)?
        };

        // an unborn HEAD gives a root commit
        let head = match self.inner.head() {
            Ok(reference) => Some(reference.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<_> = head.iter().collect();

        let oid = self.inner.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        debug!(sha = %oid, "created commit");

        Ok(CommitInfo {
            sha: oid.to_string(),
            message: message.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if `HEAD` does not resolve to a commit.
    pub fn head_sha(&self) -> Result<String> {
        Ok(self.inner.head()?.peel_to_commit()?.id().to_string())
    }
}
