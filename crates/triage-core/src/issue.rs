//! Issue data model for triage
//!
//! Mirrors the subset of the GitHub issue payload the CLI consumes.
//! Values are fetched per invocation and never mutated in place by the
//! filter pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl std::str::FromStr for IssueState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            _ => Err(crate::Error::Build(format!("unknown issue state '{}'", s))),
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// Tracker user reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    pub login: String,
}

impl User {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }

    /// Logins are case-insensitive on the tracker.
    pub fn is(&self, login: &str) -> bool {
        self.login.eq_ignore_ascii_case(login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Core issue structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,

    pub title: String,

    #[serde(default)]
    pub body: Option<String>,

    pub state: IssueState,

    /// The tracker reports an unassigned issue as `null`.
    #[serde(default)]
    pub assignee: Option<User>,

    #[serde(default)]
    pub labels: Vec<Label>,

    /// Issue author
    #[serde(rename = "user")]
    pub author: User,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Number of comments
    #[serde(default)]
    pub comments: u32,

    #[serde(default)]
    pub html_url: Option<String>,

    /// Present only when the "issue" is really a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// Create an open issue with minimal required fields
    pub fn new(number: u64, title: impl Into<String>, author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            number,
            title: title.into(),
            body: None,
            state: IssueState::Open,
            assignee: None,
            labels: Vec::new(),
            author: User::new(author),
            created_at: now,
            updated_at: now,
            comments: 0,
            html_url: None,
            pull_request: None,
        }
    }

    /// Assignee login, empty when unassigned
    pub fn assignee_login(&self) -> &str {
        self.assignee.as_ref().map(|u| u.login.as_str()).unwrap_or("")
    }

    pub fn is_assigned(&self) -> bool {
        !self.assignee_login().is_empty()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Whether the body mentions `@login` as a whole word
    pub fn mentions(&self, login: &str) -> bool {
        let Some(body) = self.body.as_deref() else {
            return false;
        };
        let is_login_char = |c: char| c.is_ascii_alphanumeric() || c == '-';
        body.match_indices('@').any(|(at, _)| {
            let rest = &body[at + 1..];
            let end = rest.find(|c: char| !is_login_char(c)).unwrap_or(rest.len());
            rest[..end].eq_ignore_ascii_case(login)
        })
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} [{}] {}", self.number, self.state, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Repository summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_JSON: &str = r#"{
        "number": 1347,
        "title": "Found a bug",
        "body": "I'm having a problem with this. cc @octocat",
        "state": "open",
        "assignee": null,
        "labels": [{"id": 1, "name": "bug", "color": "f29513"}],
        "user": {"login": "hubot", "id": 2},
        "created_at": "2011-04-22T13:33:48Z",
        "updated_at": "2011-04-22T13:33:48Z",
        "comments": 3,
        "html_url": "https://github.com/octocat/Hello-World/issues/1347"
    }"#;

    #[test]
    fn test_deserialize_tracker_payload() {
        let issue: Issue = serde_json::from_str(ISSUE_JSON).unwrap();
        assert_eq!(issue.number, 1347);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(issue.author.login, "hubot");
        assert!(!issue.is_assigned());
        assert_eq!(issue.assignee_login(), "");
        assert_eq!(issue.label_names(), vec!["bug"]);
        assert!(!issue.is_pull_request());
    }

    #[test]
    fn test_mentions_whole_word() {
        let issue: Issue = serde_json::from_str(ISSUE_JSON).unwrap();
        assert!(issue.mentions("octocat"));
        assert!(issue.mentions("OctoCat"));
        assert!(!issue.mentions("octo"));
        assert!(!issue.mentions("hubot"));
    }

    #[test]
    fn test_state_parse() {
        assert_eq!("Closed".parse::<IssueState>().unwrap(), IssueState::Closed);
        assert!("merged".parse::<IssueState>().is_err());
    }
}
