//! Issue tracker collaborator
//!
//! Command handlers only see this trait; [`crate::GithubClient`] is the
//! production implementation.

use crate::issue::{Comment, Issue, IssueState, RepoInfo, User};
use crate::query::Query;
use crate::Result;

pub trait Tracker {
    /// Issues in `state`, optionally narrowed server-side by assignee
    /// (`none`, `*` or a login).
    fn issues(&self, state: IssueState, assigned: Option<&str>) -> Result<Vec<Issue>>;

    /// One issue, with its comment thread when `with_comments` is set
    fn issue(&self, number: u64, with_comments: bool) -> Result<(Issue, Vec<Comment>)>;

    fn patch_issue(&self, number: u64, issue: &Issue) -> Result<Issue>;

    fn add_comment(&self, number: u64, body: &str) -> Result<Comment>;

    fn search_issues(&self, query: &Query) -> Result<Vec<Issue>>;

    fn repository(&self) -> Result<RepoInfo>;

    fn authenticated_user(&self) -> Result<User>;

    /// The issue in `state` that has gone longest without an update
    fn least_recently_updated(&self, state: IssueState) -> Result<Option<Issue>>;
}
