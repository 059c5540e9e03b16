//! Search query construction
//!
//! Produces the `q=...` string the tracker's issue search endpoint takes.
//! The qualifier order is fixed so the same flags always yield the same
//! query string.

use crate::filter::{FilterKind, FilterSpec};
use url::form_urlencoded;

/// Qualifiers appended after `state`, in emission order.
pub const QUALIFIER_ORDER: [FilterKind; 6] = [
    FilterKind::Author,
    FilterKind::Assignee,
    FilterKind::Mentions,
    FilterKind::Commenter,
    FilterKind::Involves,
    FilterKind::Labels,
];

/// Tracker search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build a search query for `term` scoped to `repo_full_name`.
///
/// `term` and `repo_full_name` must be non-empty; callers obtain both
/// from required CLI arguments and the resolved repository.
pub fn build_query(term: &str, repo_full_name: &str, spec: &FilterSpec) -> Query {
    debug_assert!(!term.is_empty(), "search term is required");
    debug_assert!(!repo_full_name.is_empty(), "repository is required");

    let term: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
    let state = spec.get(FilterKind::State).unwrap_or("open");

    let mut query = format!("q={}+repo:{}+state:{}", term, repo_full_name, state);
    for kind in QUALIFIER_ORDER {
        if let Some(value) = spec.get(kind) {
            query.push_str(&format!("+{}:{}", kind, value));
        }
    }
    Query(query)
}
