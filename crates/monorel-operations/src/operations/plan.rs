use monorel_core::{BumpKind, Package, ReleasePlan};
use tracing::info;

use crate::traits::{BumpSelection, ChannelSelection, PackageSelection, PromptProvider};
use crate::{OperationError, Result};

/// Turns the scanned packages and the prompt answers into a [`ReleasePlan`].
pub struct PlanBuilder<'a, Q> {
    prompts: &'a Q,
}

impl<'a, Q: PromptProvider> PlanBuilder<'a, Q> {
    #[must_use]
    pub fn new(prompts: &'a Q) -> Self {
        Self { prompts }
    }

    /// # Errors
    ///
    /// Returns an input error when nothing is scanned or selected, when no
    /// bump kind is chosen, or when a pre-release kind gets no channel.
    pub fn build(&self, packages: &[Package]) -> Result<ReleasePlan> {
        let selected = self.select_packages(packages)?;
        let full_workspace = selected.len() == packages.len();

        let kind = match self.prompts.select_bump_kind()? {
            BumpSelection::Selected(kind) => kind,
            BumpSelection::Cancelled => return Err(OperationError::MissingBumpKind),
        };
        let channel = self.select_channel(kind)?;

        let plan = ReleasePlan::new(selected, kind, channel)?
            .with_full_workspace(full_workspace)
            .with_tests(self.prompts.is_interactive());
        info!(
            packages = plan.selected_packages().len(),
            kind = %plan.bump_kind(),
            channel = ?plan.channel(),
            "release plan built"
        );
        Ok(plan)
    }

    fn select_packages(&self, packages: &[Package]) -> Result<Vec<Package>> {
        if packages.len() <= 1 {
            return Ok(packages.to_vec());
        }

        match self.prompts.select_packages(packages)? {
            PackageSelection::Selected(selected) if !selected.is_empty() => {
                // keep scan order whatever order the answers came in
                Ok(packages
                    .iter()
                    .filter(|p| selected.iter().any(|s| s.directory == p.directory))
                    .cloned()
                    .collect())
            }
            PackageSelection::Selected(_) | PackageSelection::Cancelled => {
                Err(OperationError::NoPackagesSelected)
            }
        }
    }

    fn select_channel(&self, kind: BumpKind) -> Result<Option<monorel_core::PreReleaseChannel>> {
        if !kind.is_prerelease() {
            return Ok(None);
        }

        match self.prompts.select_channel()? {
            ChannelSelection::Selected(channel) => Ok(Some(channel)),
            ChannelSelection::Cancelled => Err(OperationError::MissingChannel { kind }),
        }
    }
}
