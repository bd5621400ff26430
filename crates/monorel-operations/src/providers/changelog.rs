use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use monorel_changelog::{
    Changelog, ConventionalCommit, ReleaseLinks, RepositoryInfo, format_release_section,
};
use monorel_git::Repository;
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::traits::{ChangelogGenerator, ChangelogRequest};

/// Builds changelog sections from the conventional commits touching a
/// package since its previous release tag.
pub struct ConventionalChangelogGenerator {
    date: Option<NaiveDate>,
}

impl ConventionalChangelogGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self { date: None }
    }

    /// Stamps every section with `date` instead of today's.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn release_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for ConventionalChangelogGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag names a previous release of `package` may have been published under,
/// most specific first. The tag of the release being written is never a
/// candidate: it already exists on HEAD when changelogs are generated.
fn previous_tag_candidates(package: &str, previous: &Version, current: &str) -> Vec<String> {
    [
        format!("{package}@{previous}"),
        format!("v{previous}"),
        previous.to_string(),
    ]
    .into_iter()
    .filter(|candidate| candidate != current)
    .collect()
}

impl ChangelogGenerator for ConventionalChangelogGenerator {
    fn generate(&self, request: &ChangelogRequest<'_>) -> Result<PathBuf> {
        let repo = Repository::open(request.repository_root)?;

        let previous_tag = request.release.previous_version.as_ref().and_then(|prev| {
            previous_tag_candidates(&request.package.name, prev, request.tag)
                .into_iter()
                .find(|tag| repo.tag_exists(tag))
        });

        let commits: Vec<ConventionalCommit> = repo
            .commits_touching(&request.package.directory, previous_tag.as_deref())?
            .iter()
            .filter_map(|c| ConventionalCommit::parse(&c.sha, &c.subject, &c.body))
            .collect();
        debug!(
            package = %request.package.name,
            since = previous_tag.as_deref().unwrap_or("<start>"),
            commits = commits.len(),
            "collected changelog commits"
        );

        let repository = repo
            .remote_url(request.remote)?
            .and_then(|url| RepositoryInfo::from_remote(&url).ok());
        let links = repository.as_ref().map(|repository| ReleaseLinks {
            repository,
            previous_tag: previous_tag.as_deref(),
            tag: request.tag,
        });

        let section = format_release_section(
            &request.release.new_version,
            self.release_date(),
            &commits,
            links,
        );

        let mut changelog = Changelog::load_or_new(request.changelog_path)?;
        changelog.add_release(&section);
        changelog.write_to_file(request.changelog_path)?;
        debug!(path = %request.changelog_path.display(), "wrote changelog");

        Ok(request.changelog_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_prefer_package_scoped_tags() {
        let candidates = previous_tag_candidates("ui", &Version::new(1, 4, 0), "ui@1.5.0");

        assert_eq!(candidates, ["ui@1.4.0", "v1.4.0", "1.4.0"]);
    }

    #[test]
    fn current_release_tag_is_never_a_candidate() {
        let candidates = previous_tag_candidates("ui", &Version::new(1, 0, 1), "1.0.1");

        assert_eq!(candidates, ["ui@1.0.1", "v1.0.1"]);
    }
}
