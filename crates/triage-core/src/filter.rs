//! Flag-driven issue filtering
//!
//! CLI flags are collected into a [`FilterSpec`]. [`select_filter`] walks
//! a fixed precedence table and picks exactly one [`IssueFilter`]: the
//! first kind in [`FILTER_PRECEDENCE`] with a value wins, later ones are
//! ignored. With no such kind present the identity filter is used.
//!
//! Filters never touch their input. Surviving issues are cloned into a new
//! vector in their original order.

use crate::error::FilterError;
use crate::issue::Issue;
use std::collections::BTreeMap;

/// Constraint kinds a user can pass on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKind {
    Author,
    Assignee,
    Mentions,
    Commenter,
    Involves,
    Labels,
    State,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Author => "author",
            FilterKind::Assignee => "assignee",
            FilterKind::Mentions => "mentions",
            FilterKind::Commenter => "commenter",
            FilterKind::Involves => "involves",
            FilterKind::Labels => "labels",
            FilterKind::State => "state",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty constraint values keyed by kind.
///
/// A missing key means "no constraint". Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    values: BTreeMap<FilterKind, String>,
}

impl FilterSpec {
    /// Set a value, dropping it when empty
    pub fn set(&mut self, kind: FilterKind, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.values.remove(&kind);
        } else {
            self.values.insert(kind, value);
        }
    }

    /// Set from an optional flag value
    pub fn set_opt(&mut self, kind: FilterKind, value: Option<String>) {
        if let Some(value) = value {
            self.set(kind, value);
        }
    }

    pub fn with(mut self, kind: FilterKind, value: impl Into<String>) -> Self {
        self.set(kind, value);
        self
    }

    pub fn get(&self, kind: FilterKind) -> Option<&str> {
        self.values.get(&kind).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type FilterCtor = fn(&str) -> IssueFilter;

/// Kinds that select a local filter, highest precedence first.
///
/// `commenter` needs comment threads and `state` is applied by the fetch
/// itself, so neither has a local filter.
pub const FILTER_PRECEDENCE: [(FilterKind, FilterCtor); 5] = [
    (FilterKind::Assignee, IssueFilter::assignee),
    (FilterKind::Author, IssueFilter::author),
    (FilterKind::Mentions, IssueFilter::mentions),
    (FilterKind::Involves, IssueFilter::involves),
    (FilterKind::Labels, IssueFilter::labels),
];

/// Pick the single filter the flags ask for.
pub fn select_filter(spec: &FilterSpec) -> IssueFilter {
    let filter = FILTER_PRECEDENCE
        .iter()
        .find_map(|(kind, ctor)| spec.get(*kind).map(*ctor))
        .unwrap_or(IssueFilter::Identity);
    tracing::debug!(?filter, "selected issue filter");
    filter
}

/// One predicate over issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueFilter {
    Identity,
    /// `none` keeps unassigned issues, `*` keeps assigned ones
    Assignee(String),
    Author(String),
    Mentions(String),
    /// Author, assignee or mentioned
    Involves(String),
    /// Comma separated label terms, `!` negates a term
    Labels(String),
}

impl IssueFilter {
    fn assignee(value: &str) -> Self {
        IssueFilter::Assignee(value.to_string())
    }

    fn author(value: &str) -> Self {
        IssueFilter::Author(value.to_string())
    }

    fn mentions(value: &str) -> Self {
        IssueFilter::Mentions(value.to_string())
    }

    fn involves(value: &str) -> Self {
        IssueFilter::Involves(value.to_string())
    }

    fn labels(value: &str) -> Self {
        IssueFilter::Labels(value.to_string())
    }

    /// Filter `issues`, returning the survivors in input order.
    pub fn apply(&self, issues: &[Issue]) -> Result<Vec<Issue>, FilterError> {
        match self {
            IssueFilter::Identity => Ok(issues.to_vec()),
            IssueFilter::Assignee(who) => match who.as_str() {
                "none" => Ok(keep(issues, |i| !i.is_assigned())),
                "*" => Ok(keep(issues, Issue::is_assigned)),
                login => {
                    let login = valid_login("assignee", login)?;
                    Ok(keep(issues, |i| {
                        i.assignee.as_ref().is_some_and(|u| u.is(login))
                    }))
                }
            },
            IssueFilter::Author(login) => {
                let login = valid_login("author", login)?;
                Ok(keep(issues, |i| i.author.is(login)))
            }
            IssueFilter::Mentions(login) => {
                let login = valid_login("mentions", login)?;
                Ok(keep(issues, |i| i.mentions(login)))
            }
            IssueFilter::Involves(login) => {
                let login = valid_login("involves", login)?;
                Ok(keep(issues, |i| {
                    i.author.is(login)
                        || i.assignee.as_ref().is_some_and(|u| u.is(login))
                        || i.mentions(login)
                }))
            }
            IssueFilter::Labels(expr) => {
                let terms = parse_labels(expr)?;
                Ok(keep(issues, |i| {
                    terms.iter().all(|t| i.has_label(t.name) != t.negated)
                }))
            }
        }
    }
}

fn keep(issues: &[Issue], pred: impl Fn(&Issue) -> bool) -> Vec<Issue> {
    issues.iter().filter(|i| pred(i)).cloned().collect()
}

fn valid_login<'a>(flag: &'static str, value: &'a str) -> Result<&'a str, FilterError> {
    let value = value.trim().trim_start_matches('@');
    let ok = !value.is_empty()
        && value.len() <= 39
        && !value.starts_with('-')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if ok {
        Ok(value)
    } else {
        Err(FilterError::InvalidLogin {
            flag,
            value: value.to_string(),
        })
    }
}

struct LabelTerm<'a> {
    name: &'a str,
    negated: bool,
}

fn parse_labels(expr: &str) -> Result<Vec<LabelTerm<'_>>, FilterError> {
    expr.split(',')
        .map(|raw| {
            let raw = raw.trim();
            let (negated, name) = match raw.strip_prefix('!') {
                Some(rest) => (true, rest.trim()),
                None => (false, raw),
            };
            if name.is_empty() {
                Err(FilterError::MalformedLabels(expr.to_string()))
            } else {
                Ok(LabelTerm { name, negated })
            }
        })
        .collect()
}
