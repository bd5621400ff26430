use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("failed to resolve reference '{refspec}'")]
    RefNotFound { refspec: String },

    #[error("tag '{name}' already exists")]
    TagExists { name: String },

    #[error("failed to run `git {args}`")]
    CommandSpawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to push tag '{tag}' to '{remote}'")]
    PushFailed {
        remote: String,
        tag: String,
        output: String,
    },
}
