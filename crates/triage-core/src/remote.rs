//! Repository detection from the git `origin` remote

use crate::{Error, Result};
use url::Url;

/// `owner/name` pair identifying a repository on the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoId {
    type Err = Error;

    /// Parse `owner/name`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().trim_matches('/');
        let s = s.strip_suffix(".git").unwrap_or(s);
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoId {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::Remote(format!("expected owner/name, got '{}'", s))),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse a remote URL in scp (`git@host:o/r.git`), `ssh://` or `https://` form
pub fn parse_remote_url(remote: &str) -> Result<RepoId> {
    let remote = remote.trim();

    if !remote.contains("://") {
        if let Some((_, path)) = remote.split_once(':') {
            return path.parse();
        }
        return Err(Error::Remote(format!("unrecognized remote '{}'", remote)));
    }

    let url = Url::parse(remote)?;
    match url.scheme() {
        "https" | "http" | "ssh" | "git" => url.path().parse(),
        scheme => Err(Error::Remote(format!(
            "unsupported remote scheme '{}'",
            scheme
        ))),
    }
}

/// Resolve the repository of the current directory from `remote.origin.url`
pub fn origin_repo() -> Result<RepoId> {
    let output = std::process::Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .output()?;

    if !output.status.success() {
        return Err(Error::Remote(
            "no origin remote; pass --repo owner/name".to_string(),
        ));
    }

    let remote = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(remote = %remote.trim(), "resolved origin remote");
    parse_remote_url(&remote)
}
