use thiserror::Error;

use crate::types::{BumpKind, PreReleaseChannel};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown bump kind '{value}' (expected one of: {})", BumpKind::names().join(", "))]
    InvalidBumpKind { value: String },

    #[error("unknown pre-release channel '{value}' (expected one of: {})", PreReleaseChannel::names().join(", "))]
    InvalidChannel { value: String },

    #[error("a release plan needs at least one package")]
    EmptySelection,

    #[error("bump kind '{kind}' requires a pre-release channel")]
    MissingChannel { kind: BumpKind },

    #[error("bump kind '{kind}' does not take a pre-release channel (got '{channel}')")]
    UnexpectedChannel {
        kind: BumpKind,
        channel: PreReleaseChannel,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
