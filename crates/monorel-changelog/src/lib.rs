mod changelog;
mod commit;
mod error;
mod forge;
mod format;

pub use changelog::{CHANGELOG_TITLE, Changelog};
pub use commit::{CommitType, ConventionalCommit};
pub use error::ChangelogError;
pub use forge::{Forge, RepositoryInfo};
pub use format::{ReleaseLinks, format_release_section};

pub type Result<T> = std::result::Result<T, ChangelogError>;
