use std::fmt;
use std::str::FromStr;

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Commit types accepted by the repository's commit convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Style,
    Ci,
    Refactor,
    Perf,
    Test,
    Build,
    Chore,
    Revert,
    Release,
}

impl CommitType {
    pub const ALL: [Self; 11] = [
        Self::Feat,
        Self::Fix,
        Self::Style,
        Self::Ci,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Build,
        Self::Chore,
        Self::Revert,
        Self::Release,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Style => "style",
            Self::Ci => "ci",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Build => "build",
            Self::Chore => "chore",
            Self::Revert => "revert",
            Self::Release => "release",
        }
    }

    /// Changelog section heading, for types that appear in changelogs.
    #[must_use]
    pub fn section(self) -> Option<&'static str> {
        match self {
            Self::Feat => Some("Features"),
            Self::Fix => Some("Bug Fixes"),
            Self::Perf => Some("Performance Improvements"),
            Self::Revert => Some("Reverts"),
            _ => None,
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub sha: String,
    pub kind: CommitType,
    pub scope: Option<String>,
    pub subject: String,
    /// Text of a `BREAKING CHANGE:` footer, or the subject for a `!` header.
    pub breaking: Option<String>,
}

impl ConventionalCommit {
    /// Parse `type(scope)!: subject` plus an optional breaking-change footer.
    ///
    /// Returns `None` for subjects that do not follow the convention or use an
    /// unknown type.
    #[must_use]
    pub fn parse(sha: &str, subject: &str, body: &str) -> Option<Self> {
        let (header, description) = subject.split_once(':')?;
        let description = description.trim();
        if description.is_empty() {
            return None;
        }

        let (header, bang) = match header.strip_suffix('!') {
            Some(rest) => (rest, true),
            None => (header, false),
        };

        let (kind, scope) = match header.split_once('(') {
            Some((kind, rest)) => {
                let scope = rest.strip_suffix(')')?.trim();
                (kind, (!scope.is_empty()).then(|| scope.to_string()))
            }
            None => (header, None),
        };

        if kind.is_empty() || kind.contains(char::is_whitespace) {
            return None;
        }
        let kind: CommitType = kind.parse().ok()?;

        let footer = breaking_footer(body);
        let breaking = match (footer, bang) {
            (Some(note), _) => Some(note),
            (None, true) => Some(description.to_string()),
            (None, false) => None,
        };

        Some(Self {
            sha: sha.to_string(),
            kind,
            scope,
            subject: description.to_string(),
            breaking,
        })
    }

    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

fn breaking_footer(body: &str) -> Option<String> {
    let mut lines = body.lines();
    while let Some(line) = lines.next() {
        for marker in BREAKING_FOOTERS {
            if let Some(rest) = line.strip_prefix(marker) {
                let mut note = rest.trim().to_string();
                for continuation in lines.by_ref().take_while(|l| !l.trim().is_empty()) {
                    note.push(' ');
                    note.push_str(continuation.trim());
                }
                return Some(note.trim().to_string());
            }
        }
    }
    None
}
