use crate::error::CoreError;
use crate::types::{BumpKind, Package, PreReleaseChannel};

/// What to release and how. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    selected_packages: Vec<Package>,
    bump_kind: BumpKind,
    channel: Option<PreReleaseChannel>,
    full_workspace: bool,
    run_tests: bool,
}

impl ReleasePlan {
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySelection`] when no package is selected,
    /// [`CoreError::MissingChannel`] when a pre-release kind has no channel and
    /// [`CoreError::UnexpectedChannel`] when a stable kind has one.
    pub fn new(
        selected_packages: Vec<Package>,
        bump_kind: BumpKind,
        channel: Option<PreReleaseChannel>,
    ) -> Result<Self, CoreError> {
        if selected_packages.is_empty() {
            return Err(CoreError::EmptySelection);
        }

        match (bump_kind.is_prerelease(), channel) {
            (true, None) => return Err(CoreError::MissingChannel { kind: bump_kind }),
            (false, Some(channel)) => {
                return Err(CoreError::UnexpectedChannel {
                    kind: bump_kind,
                    channel,
                });
            }
            _ => {}
        }

        Ok(Self {
            selected_packages,
            bump_kind,
            channel,
            full_workspace: true,
            run_tests: true,
        })
    }

    /// Marks whether the selection covers every scanned package.
    #[must_use]
    pub fn with_full_workspace(mut self, full_workspace: bool) -> Self {
        self.full_workspace = full_workspace;
        self
    }

    #[must_use]
    pub fn with_tests(mut self, run_tests: bool) -> Self {
        self.run_tests = run_tests;
        self
    }

    #[must_use]
    pub fn selected_packages(&self) -> &[Package] {
        &self.selected_packages
    }

    #[must_use]
    pub fn bump_kind(&self) -> BumpKind {
        self.bump_kind
    }

    #[must_use]
    pub fn channel(&self) -> Option<PreReleaseChannel> {
        self.channel
    }

    #[must_use]
    pub fn is_full_workspace(&self) -> bool {
        self.full_workspace
    }

    #[must_use]
    pub fn runs_tests(&self) -> bool {
        self.run_tests
    }

    #[must_use]
    pub fn is_single_package(&self) -> bool {
        self.selected_packages.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packages(names: &[&str]) -> Vec<Package> {
        names
            .iter()
            .map(|n| Package::new(*n, format!("/repo/packages/{n}")))
            .collect()
    }

    #[test]
    fn empty_selection_is_rejected() {
        let result = ReleasePlan::new(Vec::new(), BumpKind::Patch, None);

        assert!(matches!(result, Err(CoreError::EmptySelection)));
    }

    #[test]
    fn channel_present_exactly_for_pre_kinds() {
        for kind in BumpKind::ALL {
            let with = ReleasePlan::new(packages(&["a"]), kind, Some(PreReleaseChannel::Beta));
            let without = ReleasePlan::new(packages(&["a"]), kind, None);

            if kind.is_prerelease() {
                assert!(with.is_ok(), "{kind} should accept a channel");
                assert!(matches!(without, Err(CoreError::MissingChannel { .. })));
            } else {
                assert!(matches!(with, Err(CoreError::UnexpectedChannel { .. })));
                assert!(without.is_ok(), "{kind} should not need a channel");
            }
        }
    }

    #[test]
    fn defaults_to_full_workspace_with_tests() -> Result<(), CoreError> {
        let plan = ReleasePlan::new(packages(&["a", "b"]), BumpKind::Minor, None)?;

        assert!(plan.is_full_workspace());
        assert!(plan.runs_tests());
        assert!(!plan.is_single_package());
        Ok(())
    }

    #[test]
    fn builder_flags_are_recorded() -> Result<(), CoreError> {
        let plan = ReleasePlan::new(packages(&["a"]), BumpKind::Major, None)?
            .with_full_workspace(false)
            .with_tests(false);

        assert!(!plan.is_full_workspace());
        assert!(!plan.runs_tests());
        assert!(plan.is_single_package());
        Ok(())
    }
}
