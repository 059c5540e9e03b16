//! triage-core: Core library for the triage CLI
//!
//! Provides the issue model, the search query builder, the flag-driven
//! filter pipeline and the GitHub tracker client. Nothing is cached
//! locally - every command fetches what it needs.

pub mod config;
pub mod duration;
pub mod error;
pub mod filter;
pub mod github;
pub mod issue;
pub mod query;
pub mod remote;
pub mod tracker;

pub use config::Config;
pub use duration::human_duration;
pub use error::{Error, FilterError};
pub use filter::{FilterKind, FilterSpec, IssueFilter, select_filter};
pub use github::GithubClient;
pub use issue::{Comment, Issue, IssueState, Label, RepoInfo, User};
pub use query::{Query, build_query};
pub use remote::RepoId;
pub use tracker::Tracker;

/// Result type for triage operations
pub type Result<T> = std::result::Result<T, Error>;
