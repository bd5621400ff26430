use std::path::Path;

use monorel_manifest::{FileSnapshot, write_version_file};
use semver::Version;

const SRC: &str = "src";
const FILE: &str = "src/version.ts";

#[test]
fn writes_version_file_when_source_dir_exists() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("src"))?;

    let written = write_version_file(
        dir.path(),
        &Version::parse("1.2.4-beta.0")?,
        Path::new(SRC),
        Path::new(FILE),
    )?;

    assert_eq!(written, Some(dir.path().join(FILE)));
    assert_eq!(
        std::fs::read_to_string(dir.path().join(FILE))?,
        "export default '1.2.4-beta.0'\n"
    );
    Ok(())
}

#[test]
fn does_nothing_without_source_dir() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let written = write_version_file(
        dir.path(),
        &Version::new(1, 0, 0),
        Path::new(SRC),
        Path::new(FILE),
    )?;

    assert_eq!(written, None);
    assert!(!dir.path().join(SRC).exists());
    Ok(())
}

#[test]
fn rewriting_is_idempotent_and_replaces_stale_content() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("src"))?;
    std::fs::write(dir.path().join(FILE), "export const stale = true\n")?;
    let version = Version::new(2, 0, 0);

    write_version_file(dir.path(), &version, Path::new(SRC), Path::new(FILE))?;
    let first = std::fs::read(dir.path().join(FILE))?;
    write_version_file(dir.path(), &version, Path::new(SRC), Path::new(FILE))?;
    let second = std::fs::read(dir.path().join(FILE))?;

    assert_eq!(first, second);
    assert_eq!(String::from_utf8(second)?, "export default '2.0.0'\n");
    Ok(())
}

#[test]
fn snapshot_undoes_a_fresh_version_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir(dir.path().join("src"))?;
    let target = dir.path().join(FILE);

    let snapshot = FileSnapshot::capture(&target)?;
    write_version_file(dir.path(), &Version::new(0, 1, 0), Path::new(SRC), Path::new(FILE))?;
    snapshot.restore()?;

    assert!(!target.exists());
    Ok(())
}
