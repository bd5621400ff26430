mod config;
mod error;
mod manifest;
mod workspace;

pub use config::{ReleaseConfig, VersionFileConfig};
pub use error::WorkspaceError;
pub use workspace::{
    PNPM_WORKSPACE_FILE, Workspace, WorkspaceKind, discover_workspace,
    discover_workspace_from_cwd, scan_packages,
};

pub type Result<T> = std::result::Result<T, WorkspaceError>;
