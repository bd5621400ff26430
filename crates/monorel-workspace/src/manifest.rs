use std::path::PathBuf;

use serde::Deserialize;

/// The subset of `package.json` the scanner cares about.
#[derive(Debug, Deserialize)]
pub(crate) struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub private: bool,
    pub workspaces: Option<WorkspacesField>,
    pub monorel: Option<ReleaseMetadata>,
}

/// npm/yarn accept either a bare pattern list or `{ "packages": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WorkspacesField {
    Patterns(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl WorkspacesField {
    pub fn into_patterns(self) -> Vec<String> {
        match self {
            Self::Patterns(patterns) | Self::Object { packages: patterns } => patterns,
        }
    }
}

/// The `"monorel"` object of the root manifest, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ReleaseMetadata {
    pub test_command: Option<Vec<String>>,
    pub build_command: Option<Vec<String>>,
    pub publish_command: Option<Vec<String>>,
    pub version_file: Option<VersionFileMetadata>,
    pub changelog_file: Option<PathBuf>,
    pub remote: Option<String>,
    pub rollback: Option<bool>,
    pub require_clean_tree: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct VersionFileMetadata {
    pub source_dir: Option<PathBuf>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PnpmWorkspace {
    #[serde(default)]
    pub packages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspaces_accepts_array_and_object_forms() -> anyhow::Result<()> {
        let array: PackageManifest =
            serde_json::from_str(r#"{ "name": "root", "workspaces": ["packages/*"] }"#)?;
        let object: PackageManifest = serde_json::from_str(
            r#"{ "name": "root", "workspaces": { "packages": ["libs/*"], "nohoist": [] } }"#,
        )?;

        assert_eq!(
            array.workspaces.map(WorkspacesField::into_patterns),
            Some(vec!["packages/*".to_string()])
        );
        assert_eq!(
            object.workspaces.map(WorkspacesField::into_patterns),
            Some(vec!["libs/*".to_string()])
        );
        Ok(())
    }

    #[test]
    fn release_metadata_uses_camel_case_keys() -> anyhow::Result<()> {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{
                "name": "root",
                "monorel": {
                    "testCommand": ["npm", "test"],
                    "requireCleanTree": true,
                    "versionFile": { "path": "lib/version.ts" }
                }
            }"#,
        )?;

        let metadata = manifest.monorel.expect("metadata present");
        assert_eq!(
            metadata.test_command,
            Some(vec!["npm".to_string(), "test".to_string()])
        );
        assert_eq!(metadata.require_clean_tree, Some(true));
        assert_eq!(
            metadata.version_file.and_then(|v| v.path),
            Some(PathBuf::from("lib/version.ts"))
        );
        Ok(())
    }

    #[test]
    fn unknown_release_keys_are_rejected() {
        let result: Result<PackageManifest, _> =
            serde_json::from_str(r#"{ "name": "root", "monorel": { "rolback": false } }"#);

        assert!(result.is_err());
    }

    #[test]
    fn unrelated_fields_are_ignored() -> anyhow::Result<()> {
        let manifest: PackageManifest = serde_json::from_str(
            r#"{ "name": "a", "version": "1.0.0", "scripts": { "test": "vitest" } }"#,
        )?;

        assert_eq!(manifest.name.as_deref(), Some("a"));
        assert_eq!(manifest.version.as_deref(), Some("1.0.0"));
        assert!(!manifest.private);
        assert!(manifest.workspaces.is_none());
        Ok(())
    }
}
