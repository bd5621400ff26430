use std::fmt::Write;

use chrono::NaiveDate;
use semver::Version;

use crate::commit::{CommitType, ConventionalCommit};
use crate::forge::RepositoryInfo;

const SECTION_ORDER: [CommitType; 4] = [
    CommitType::Feat,
    CommitType::Fix,
    CommitType::Perf,
    CommitType::Revert,
];

/// Hyperlink targets for one release section.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseLinks<'a> {
    pub repository: &'a RepositoryInfo,
    /// Tag of the previous release, used for the compare link.
    pub previous_tag: Option<&'a str>,
    pub tag: &'a str,
}

/// Render one release as markdown, ending with a blank line.
///
/// Commits without a changelog section are dropped unless they carry a
/// breaking change. A release without qualifying commits renders only its
/// header.
#[must_use]
pub fn format_release_section(
    version: &Version,
    date: NaiveDate,
    commits: &[ConventionalCommit],
    links: Option<ReleaseLinks<'_>>,
) -> String {
    let mut out = format_header(version, date, links);
    out.push('\n');

    for kind in SECTION_ORDER {
        let Some(title) = kind.section() else {
            continue;
        };
        let entries: Vec<_> = commits.iter().filter(|c| c.kind == kind).collect();
        if entries.is_empty() {
            continue;
        }

        let _ = write!(out, "### {title}\n\n");
        for commit in entries {
            out.push_str(&format_entry(commit, links));
        }
        out.push('\n');
    }

    let breaking: Vec<_> = commits
        .iter()
        .filter_map(|c| c.breaking.as_deref().map(|note| (c, note)))
        .collect();
    if !breaking.is_empty() {
        out.push_str("### BREAKING CHANGES\n\n");
        for (commit, note) in breaking {
            out.push_str("* ");
            push_scope(&mut out, commit.scope.as_deref());
            out.push_str(note);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

fn format_header(version: &Version, date: NaiveDate, links: Option<ReleaseLinks<'_>>) -> String {
    let date = date.format("%Y-%m-%d");
    match links {
        Some(ReleaseLinks {
            repository,
            previous_tag: Some(previous),
            tag,
        }) => format!(
            "## [{version}]({}) ({date})\n",
            repository.comparison_url(previous, tag)
        ),
        _ => format!("## {version} ({date})\n"),
    }
}

fn format_entry(commit: &ConventionalCommit, links: Option<ReleaseLinks<'_>>) -> String {
    let mut line = String::from("* ");
    push_scope(&mut line, commit.scope.as_deref());
    line.push_str(&commit.subject);

    let short = commit.short_sha();
    match links {
        Some(links) => {
            let _ = write!(line, " ([{short}]({}))", links.repository.commit_url(&commit.sha));
        }
        None => {
            let _ = write!(line, " ({short})");
        }
    }
    line.push('\n');
    line
}

fn push_scope(out: &mut String, scope: Option<&str>) {
    if let Some(scope) = scope {
        let _ = write!(out, "**{scope}:** ");
    }
}
