#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target_sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub message: String,
}

/// A commit as seen by changelog generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
    /// First line of the message.
    pub subject: String,
    /// Everything after the subject, trimmed.
    pub body: String,
}

impl CommitSummary {
    pub(crate) fn from_message(sha: String, message: &str) -> Self {
        let (subject, body) = message.split_once('\n').unwrap_or((message, ""));
        Self {
            sha,
            subject: subject.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
