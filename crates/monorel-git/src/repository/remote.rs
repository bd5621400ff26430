use std::process::Command;

use tracing::debug;

use crate::{GitError, Repository, Result};

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the remote lookup fails for any reason other than
    /// the remote not being configured.
    pub fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.inner.find_remote(remote) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Push one tag with the system `git`, so the user's credential helpers
    /// and SSH agent apply.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::CommandSpawn`] if `git` cannot be started and
    /// [`GitError::PushFailed`] with the captured output if the push fails.
    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        let refspec = format!("refs/tags/{tag}");
        let output = Command::new("git")
            .arg("push")
            .arg(remote)
            .arg(&refspec)
            .current_dir(self.root())
            .output()
            .map_err(|source| GitError::CommandSpawn {
                args: format!("push {remote} {refspec}"),
                source,
            })?;

        if !output.status.success() {
            let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(GitError::PushFailed {
                remote: remote.to_string(),
                tag: tag.to_string(),
                output: captured.trim().to_string(),
            });
        }

        debug!(remote, tag, "pushed tag");
        Ok(())
    }
}
