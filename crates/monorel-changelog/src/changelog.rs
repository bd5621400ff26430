use std::path::Path;

use crate::error::ChangelogError;

pub const CHANGELOG_TITLE: &str = "# Changelog";

/// A `CHANGELOG.md` with the newest release on top.
#[derive(Debug, Clone)]
pub struct Changelog {
    content: String,
}

impl Default for Changelog {
    fn default() -> Self {
        Self::new()
    }
}

impl Changelog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: format!("{CHANGELOG_TITLE}\n\n"),
        }
    }

    /// Load the file, or start a new changelog when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Read` if an existing file cannot be read.
    pub fn load_or_new(path: &Path) -> Result<Self, ChangelogError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_content(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(ChangelogError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Wrap existing text; a missing title is added on top.
    #[must_use]
    pub fn from_content(content: String) -> Self {
        if content.lines().any(|l| l.trim() == CHANGELOG_TITLE) {
            Self { content }
        } else if content.trim().is_empty() {
            Self::new()
        } else {
            Self {
                content: format!("{CHANGELOG_TITLE}\n\n{content}"),
            }
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Insert a rendered release section above every earlier release.
    pub fn add_release(&mut self, section: &str) {
        let at = self.insertion_point();
        let (head, rest) = self.content.split_at(at);

        let mut updated = String::with_capacity(self.content.len() + section.len() + 2);
        updated.push_str(head);
        if !updated.ends_with("\n\n") {
            updated.push_str(if updated.ends_with('\n') { "\n" } else { "\n\n" });
        }
        updated.push_str(section.trim_end_matches('\n'));
        updated.push('\n');
        if !rest.is_empty() {
            updated.push('\n');
            updated.push_str(rest.trim_start_matches('\n'));
        }

        self.content = updated;
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::Write` if the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ChangelogError> {
        std::fs::write(path, &self.content).map_err(|source| ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Start of the first release heading, or the end of the file.
    fn insertion_point(&self) -> usize {
        let mut offset = 0;
        for line in self.content.split_inclusive('\n') {
            if line.starts_with("## ") || line.starts_with("<a name=") {
                return offset;
            }
            offset += line.len();
        }
        self.content.len()
    }
}
