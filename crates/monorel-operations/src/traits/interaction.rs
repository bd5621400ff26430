use monorel_core::{BumpKind, Package, PreReleaseChannel, ReleasePlan};
use semver::Version;

use crate::Result;

#[derive(Debug, Clone)]
pub enum PackageSelection {
    Selected(Vec<Package>),
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum BumpSelection {
    Selected(BumpKind),
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum ChannelSelection {
    Selected(PreReleaseChannel),
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum TagVersionInput {
    Provided(String),
    Cancelled,
}

/// Answers the questions a release asks.
///
/// Interactive implementations prompt on a terminal; non-interactive ones
/// replay answers supplied up front.
pub trait PromptProvider: Send + Sync {
    /// Whether answers come from a person. Non-interactive runs skip the
    /// test stage and every confirmation.
    fn is_interactive(&self) -> bool;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_packages(&self, available: &[Package]) -> Result<PackageSelection>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_bump_kind(&self) -> Result<BumpSelection>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_channel(&self) -> Result<ChannelSelection>;

    /// Asks for the tag of a partial multi-package release.
    ///
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn input_tag_version(&self, default: &Version) -> Result<TagVersionInput>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn confirm_release(&self, plan: &ReleasePlan) -> Result<bool>;
}
