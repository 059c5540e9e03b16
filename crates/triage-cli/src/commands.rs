//! CLI command implementations
//!
//! Handlers get everything they need through [`Context`]; output goes to
//! the writer they are handed.

use crate::display;
use anyhow::{Result, bail};
use chrono::Utc;
use colored::Colorize;
use std::io::Write;
use std::path::Path;
use triage_core::config::DisplayConfig;
use triage_core::{
    Config, Error, FilterSpec, Issue, IssueState, RepoId, Tracker, build_query, human_duration,
    select_filter,
};

pub struct Context<'a> {
    pub tracker: &'a dyn Tracker,
    pub repo: RepoId,
    pub display: DisplayConfig,
}

/// Open issues (or `state`), narrowed by the filter the flags select.
/// Fetch order is preserved.
pub fn list(
    ctx: &Context<'_>,
    state: IssueState,
    assigned: Option<&str>,
    filters: &FilterSpec,
) -> Result<Vec<Issue>> {
    let filter = select_filter(filters);
    let issues = ctx.tracker.issues(state, assigned)?;
    Ok(filter.apply(&issues)?)
}

pub fn search(ctx: &Context<'_>, term: &str, filters: &FilterSpec) -> Result<Vec<Issue>> {
    let query = build_query(term, &ctx.repo.full_name(), filters);
    tracing::debug!(%query, "searching issues");
    Ok(ctx.tracker.search_issues(&query)?)
}

pub fn show(ctx: &Context<'_>, number: u64, out: &mut dyn Write) -> Result<()> {
    let (issue, comments) = ctx.tracker.issue(number, true)?;
    display::print_issue(out, &issue, &comments, &ctx.display.date_format)
}

pub fn comment(ctx: &Context<'_>, number: u64, body: &str, out: &mut dyn Write) -> Result<()> {
    let comment = ctx.tracker.add_comment(number, body)?;
    display::print_comment_added(out, &comment)
}

pub fn vote(ctx: &Context<'_>, number: u64, out: &mut dyn Write) -> Result<()> {
    ctx.tracker.add_comment(number, "+1")?;
    writeln!(out, "Vote added to the issue: {}", number)?;
    Ok(())
}

/// Assign `number` to the authenticated user.
///
/// An issue that already has an assignee is left alone unless
/// `overwrite` is set. When the tracker refuses the assignment (no push
/// access) a `#volunteer` comment is left instead.
pub fn take(ctx: &Context<'_>, number: u64, overwrite: bool, out: &mut dyn Write) -> Result<()> {
    let (mut issue, _) = ctx.tracker.issue(number, false)?;
    let user = ctx.tracker.authenticated_user()?;

    if issue.is_assigned() && !overwrite {
        writeln!(
            out,
            "Use the flag --overwrite to take the issue from {}",
            issue.assignee_login().yellow()
        )?;
        return Ok(());
    }

    issue.assignee = Some(user.clone());
    let patched = ctx.tracker.patch_issue(number, &issue)?;

    if patched.assignee.as_ref().is_some_and(|a| a.is(&user.login)) {
        writeln!(
            out,
            "{} The issue {} was assigned to {}",
            "✓".green(),
            number,
            user.login
        )?;
    } else {
        ctx.tracker.add_comment(number, "#volunteer")?;
        writeln!(
            out,
            "No permission to assign. You '{}' were added as #volunteer.",
            user.login
        )?;
    }
    Ok(())
}

/// Age of the least recently updated open issue
pub fn alru(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    match ctx.tracker.least_recently_updated(IssueState::Open)? {
        Some(issue) => writeln!(
            out,
            "{} (#{})",
            human_duration(Utc::now() - issue.updated_at),
            issue.number
        )?,
        None => writeln!(out, "No open issues")?,
    }
    Ok(())
}

pub fn info(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let repo = ctx.tracker.repository()?;
    display::print_repository(out, &repo)
}

/// Register a token and/or user name, then show what is stored
pub fn auth(
    path: &Path,
    token: Option<&str>,
    user: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut config = match Config::load(path) {
        Ok(config) => config,
        Err(Error::ConfigNotFound(_)) => Config::default(),
        Err(e) => return Err(e.into()),
    };

    if let Some(user) = user.filter(|u| !u.trim().is_empty()) {
        config.user_name = Some(user.trim().to_string());
        config.save(path)?;
    }
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        config.token = token.trim().to_string();
        config.save(path)?;
    }

    match Config::load(path) {
        Ok(config) if config.has_token() => {
            match &config.user_name {
                Some(name) => writeln!(out, "Token: {}, UserName: {}", config.token, name)?,
                None => writeln!(out, "Token: {}", config.token)?,
            }
            Ok(())
        }
        Ok(_) | Err(Error::ConfigNotFound(_)) => bail!("No token registered"),
        Err(e) => Err(e.into()),
    }
}
