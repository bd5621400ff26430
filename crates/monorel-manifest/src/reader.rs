use std::path::Path;

use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;

/// Parse a `package.json` into an order-preserving JSON object.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or its top
/// level is not an object.
pub fn read_document(path: &Path) -> Result<Map<String, Value>, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(path, &content)
}

pub(crate) fn parse_document(path: &Path, content: &str) -> Result<Map<String, Value>, ManifestError> {
    match serde_json::from_str(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ManifestError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// # Errors
///
/// Returns an error if the manifest cannot be read, lacks a string `version`,
/// or the version is not valid semver.
pub fn read_version(path: &Path) -> Result<Version, ManifestError> {
    let doc = read_document(path)?;

    let version = doc
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| ManifestError::MissingField {
            path: path.to_path_buf(),
            field: "version",
        })?;

    Version::parse(version.trim()).map_err(|source| ManifestError::InvalidVersion {
        path: path.to_path_buf(),
        version: version.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(content: &str) -> anyhow::Result<(tempfile::TempDir, std::path::PathBuf)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("package.json");
        std::fs::write(&path, content)?;
        Ok((dir, path))
    }

    #[test]
    fn reads_version() -> anyhow::Result<()> {
        let (_dir, path) = manifest(r#"{ "name": "a", "version": "1.4.0-beta.2" }"#)?;

        assert_eq!(read_version(&path)?, Version::parse("1.4.0-beta.2")?);
        Ok(())
    }

    #[test]
    fn missing_version_is_reported() -> anyhow::Result<()> {
        let (_dir, path) = manifest(r#"{ "name": "a" }"#)?;

        let result = read_version(&path);

        assert!(matches!(
            result,
            Err(ManifestError::MissingField {
                field: "version",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn unparsable_version_is_reported() -> anyhow::Result<()> {
        let (_dir, path) = manifest(r#"{ "name": "a", "version": "latest" }"#)?;

        assert!(matches!(
            read_version(&path),
            Err(ManifestError::InvalidVersion { .. })
        ));
        Ok(())
    }

    #[test]
    fn top_level_array_is_rejected() -> anyhow::Result<()> {
        let (_dir, path) = manifest("[]")?;

        assert!(matches!(
            read_document(&path),
            Err(ManifestError::NotAnObject { .. })
        ));
        Ok(())
    }

    #[test]
    fn preserves_key_order() -> anyhow::Result<()> {
        let (_dir, path) = manifest(r#"{ "version": "1.0.0", "name": "a", "main": "x.js" }"#)?;

        let keys: Vec<_> = read_document(&path)?.keys().cloned().collect();

        assert_eq!(keys, vec!["version", "name", "main"]);
        Ok(())
    }
}
