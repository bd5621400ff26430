use std::path::Path;

use semver::Version;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ManifestError;
use crate::reader::{parse_document, read_version};

const DEFAULT_INDENT: &str = "  ";

/// Set `version` in a `package.json`, keeping key order and indentation.
///
/// The output always ends with a single newline.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, parsed, or written.
pub fn write_version(path: &Path, version: &Version) -> Result<(), ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = parse_document(path, &content)?;
    doc.insert("version".to_string(), Value::String(version.to_string()));

    let rendered = render(path, doc, &detect_indent(&content))?;
    std::fs::write(path, rendered).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(manifest = %path.display(), %version, "wrote version");
    Ok(())
}

/// # Errors
///
/// Returns `ManifestError::VerificationFailed` if the version in the manifest
/// does not match the expected version.
pub fn verify_version(path: &Path, expected: &Version) -> Result<(), ManifestError> {
    let actual = read_version(path)?;

    if actual != *expected {
        return Err(ManifestError::VerificationFailed {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}

/// Leading whitespace of the first indented line.
fn detect_indent(content: &str) -> String {
    content
        .lines()
        .skip(1)
        .find_map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            (!trimmed.is_empty() && !indent.is_empty()).then(|| indent.to_string())
        })
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

fn render(path: &Path, doc: Map<String, Value>, indent: &str) -> Result<Vec<u8>, ManifestError> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);

    Value::Object(doc)
        .serialize(&mut serializer)
        .map_err(|source| ManifestError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    out.push(b'\n');
    Ok(out)
}
