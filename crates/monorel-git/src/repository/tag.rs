use tracing::debug;

use crate::{GitError, Result, TagInfo};

use super::Repository;

impl Repository {
    /// Create an annotated tag on `HEAD`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::TagExists`] if the tag already exists, or an error
    /// if it cannot be created.
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        if self.tag_exists(name) {
            return Err(GitError::TagExists {
                name: name.to_string(),
            });
        }

        let head = self.inner.head()?.peel_to_commit()?;
        let sig = self.inner.signature()?;

        self.inner
            .tag(name, head.as_object(), &sig, message, false)?;

        debug!(tag = name, target = %head.id(), "created tag");

        Ok(TagInfo {
            name: name.to_string(),
            target_sha: head.id().to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the tag does not exist.
    pub fn delete_tag(&self, name: &str) -> Result<()> {
        if !self.tag_exists(name) {
            return Err(GitError::RefNotFound {
                refspec: format!("refs/tags/{name}"),
            });
        }

        self.inner.tag_delete(name)?;
        debug!(tag = name, "deleted tag");
        Ok(())
    }

    #[must_use]
    pub fn tag_exists(&self, name: &str) -> bool {
        self.inner
            .find_reference(&format!("refs/tags/{name}"))
            .is_ok()
    }

    /// The commit a tag points at, peeling annotated tags.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the tag does not exist.
    pub fn tag_target(&self, name: &str) -> Result<git2::Oid> {
        let refspec = format!("refs/tags/{name}");
        let reference = self
            .inner
            .find_reference(&refspec)
            .map_err(|_| GitError::RefNotFound { refspec })?;

        Ok(reference.peel_to_commit()?.id())
    }
}
