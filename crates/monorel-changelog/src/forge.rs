use url::Url;

use crate::error::ChangelogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
}

/// Web location of a hosted repository, derived from its remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// Accepts `https://`, `ssh://` and scp-style `git@host:owner/repo.git`
    /// remotes. Web links always use `https`.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` if the URL is invalid and
    /// `ChangelogError::InvalidRepositoryPath` if it lacks owner and repo.
    pub fn from_remote(remote: &str) -> Result<Self, ChangelogError> {
        let normalized = normalize_scp(remote.trim());
        let url = Url::parse(&normalized).map_err(|source| ChangelogError::UrlParse {
            url: remote.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ChangelogError::UrlParse {
            url: remote.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let forge = detect_forge(host);
        let (owner, repo) = extract_owner_repo(&url)?;

        let base_url =
            Url::parse(&format!("https://{host}")).map_err(|source| ChangelogError::UrlParse {
                url: remote.to_string(),
                source,
            })?;

        Ok(Self {
            forge,
            owner,
            repo,
            base_url,
        })
    }

    #[must_use]
    pub fn repository_url(&self) -> String {
        format!("{}{}/{}", self.base_url, self.owner, self.repo)
    }

    #[must_use]
    pub fn comparison_url(&self, base_tag: &str, target_tag: &str) -> String {
        let base_tag = encode_ref(base_tag);
        let target_tag = encode_ref(target_tag);
        let repository = self.repository_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => {
                format!("{repository}/compare/{base_tag}...{target_tag}")
            }
            Forge::GitLab => format!("{repository}/-/compare/{base_tag}...{target_tag}"),
            Forge::Bitbucket => {
                format!("{repository}/branches/compare/{target_tag}..{base_tag}")
            }
        }
    }

    #[must_use]
    pub fn commit_url(&self, sha: &str) -> String {
        let repository = self.repository_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{repository}/commit/{sha}"),
            Forge::GitLab => format!("{repository}/-/commit/{sha}"),
            Forge::Bitbucket => format!("{repository}/commits/{sha}"),
        }
    }
}

/// `git@host:owner/repo` -> `ssh://git@host/owner/repo`.
fn normalize_scp(remote: &str) -> String {
    if remote.contains("://") {
        return remote.to_string();
    }
    match remote.split_once(':') {
        Some((host, path)) if !host.contains('/') => format!("ssh://{host}/{path}"),
        _ => remote.to_string(),
    }
}

/// Scoped tags such as `@scope/pkg@1.0.0` must stay one path segment.
fn encode_ref(tag: &str) -> String {
    tag.replace('/', "%2F")
}

fn detect_forge(host: &str) -> Forge {
    let host_lower = host.to_lowercase();

    if host_lower == "gitlab.com"
        || host_lower.starts_with("gitlab.")
        || host_lower.contains(".gitlab.")
    {
        Forge::GitLab
    } else if host_lower == "bitbucket.org" || host_lower.ends_with(".bitbucket.org") {
        Forge::Bitbucket
    } else if host_lower == "codeberg.org" || host_lower.starts_with("gitea.") {
        Forge::Gitea
    } else {
        Forge::GitHub
    }
}

fn extract_owner_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let [owner, repo, ..] = segments.as_slice() else {
        return Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        });
    };

    Ok(((*owner).to_string(), (*repo).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_remote() {
        let info =
            RepositoryInfo::from_remote("https://github.com/owner/repo.git").expect("should parse");
        assert_eq!(info.forge, Forge::GitHub);
        assert_eq!(info.owner, "owner");
        assert_eq!(info.repo, "repo");
        assert_eq!(info.repository_url(), "https://github.com/owner/repo");
    }

    #[test]
    fn parses_scp_style_remote() {
        let info = RepositoryInfo::from_remote("git@gitlab.com:group/project.git")
            .expect("should parse");
        assert_eq!(info.forge, Forge::GitLab);
        assert_eq!(
            info.commit_url("abc"),
            "https://gitlab.com/group/project/-/commit/abc"
        );
    }

    #[test]
    fn comparison_url_escapes_scoped_tags() {
        let info = RepositoryInfo::from_remote("https://github.com/o/r").expect("should parse");

        assert_eq!(
            info.comparison_url("@s/a@1.0.0", "@s/a@1.1.0"),
            "https://github.com/o/r/compare/@s%2Fa@1.0.0...@s%2Fa@1.1.0"
        );
    }

    #[test]
    fn bitbucket_compare_is_reversed() {
        let info =
            RepositoryInfo::from_remote("https://bitbucket.org/o/r").expect("should parse");

        assert_eq!(
            info.comparison_url("1.0.0", "1.1.0"),
            "https://bitbucket.org/o/r/branches/compare/1.1.0..1.0.0"
        );
    }

    #[test]
    fn rejects_remote_without_repo() {
        let result = RepositoryInfo::from_remote("https://github.com/only-owner");
        assert!(matches!(
            result,
            Err(ChangelogError::InvalidRepositoryPath { .. })
        ));
    }

    #[test]
    fn rejects_local_path() {
        assert!(RepositoryInfo::from_remote("/srv/git/repo.git").is_err());
    }
}
