use chrono::NaiveDate;
use monorel_changelog::{Changelog, ConventionalCommit, format_release_section};
use semver::Version;

#[test]
fn appends_releases_to_file_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("CHANGELOG.md");
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).ok_or_else(|| anyhow::anyhow!("invalid date"))?;

    let commits: Vec<_> = [("aaaaaaa1", "feat: first feature"), ("bbbbbbb2", "docs: readme")]
        .iter()
        .filter_map(|(sha, subject)| ConventionalCommit::parse(sha, subject, ""))
        .collect();

    let mut changelog = Changelog::load_or_new(&path)?;
    changelog.add_release(&format_release_section(
        &Version::new(0, 1, 0),
        date,
        &commits,
        None,
    ));
    changelog.write_to_file(&path)?;

    let mut changelog = Changelog::load_or_new(&path)?;
    changelog.add_release(&format_release_section(&Version::new(0, 1, 1), date, &[], None));
    changelog.write_to_file(&path)?;

    let content = std::fs::read_to_string(&path)?;
    assert_eq!(
        content,
        "# Changelog\n\n\
         ## 0.1.1 (2025-06-01)\n\n\
         ## 0.1.0 (2025-06-01)\n\n### Features\n\n* first feature (aaaaaaa)\n"
    );
    Ok(())
}
