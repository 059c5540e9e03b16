//! Plain-text output

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;
use tabled::{Table, Tabled, settings::Style};
use triage_core::{Comment, Issue, RepoInfo, human_duration};
use triage_term::fit;

pub fn print_issues(
    out: &mut dyn Write,
    issues: &[Issue],
    no_trunc: bool,
    max_title_length: usize,
) -> Result<()> {
    if issues.is_empty() {
        writeln!(out, "No issues found")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8}{:<20}{}",
        "NUMBER".bold(),
        "LAST UPDATED".bold(),
        "TITLE".bold()
    )?;
    for issue in issues {
        let updated = format!("{} ago", human_duration(Utc::now() - issue.updated_at));
        let title = fit(&issue.title, max_title_length, no_trunc);
        let assignee = if issue.is_assigned() {
            format!("  @{}", issue.assignee_login()).yellow().to_string()
        } else {
            String::new()
        };
        writeln!(
            out,
            "{:<8}{:<20}{}{}",
            issue.number.to_string().cyan(),
            updated,
            title,
            assignee
        )?;
    }
    Ok(())
}

pub fn print_issue(
    out: &mut dyn Write,
    issue: &Issue,
    comments: &[Comment],
    date_format: &str,
) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        format!("#{}", issue.number).cyan().bold(),
        issue.title.bold()
    )?;
    writeln!(out)?;
    writeln!(out, "State:    {}", issue.state)?;
    writeln!(out, "Author:   {}", issue.author.login)?;
    if issue.is_assigned() {
        writeln!(out, "Assignee: {}", issue.assignee_login())?;
    }
    let labels = issue.label_names();
    if !labels.is_empty() {
        writeln!(out, "Labels:   {}", labels.join(", "))?;
    }
    writeln!(out, "Created:  {}", format_date(&issue.created_at, date_format)?)?;
    writeln!(out, "Updated:  {}", format_date(&issue.updated_at, date_format)?)?;
    if let Some(url) = &issue.html_url {
        writeln!(out, "URL:      {}", url)?;
    }

    if let Some(body) = issue.body.as_deref().filter(|b| !b.trim().is_empty()) {
        writeln!(out)?;
        writeln!(out, "{}", body.trim_end())?;
    }

    if !comments.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", format!("Comments ({}):", comments.len()).bold())?;
        for comment in comments {
            writeln!(out)?;
            writeln!(
                out,
                "{} {}",
                comment.user.login.cyan(),
                format_date(&comment.created_at, date_format)?.dimmed()
            )?;
            writeln!(out, "{}", comment.body.trim_end())?;
        }
    }
    Ok(())
}

/// Render `date` with a user supplied strftime string; bad specifiers
/// are an error, not a panic.
fn format_date(date: &DateTime<Utc>, format: &str) -> Result<String> {
    use std::fmt::Write as _;
    let mut text = String::new();
    write!(text, "{}", date.format(format))
        .map_err(|_| anyhow!("Invalid date format '{}'", format))?;
    Ok(text)
}

pub fn print_comment_added(out: &mut dyn Write, comment: &Comment) -> Result<()> {
    match &comment.html_url {
        Some(url) => writeln!(out, "{} Comment added: {}", "✓".green(), url)?,
        None => writeln!(out, "{} Comment added", "✓".green())?,
    }
    Ok(())
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Forks")]
    forks: u64,
    #[tabled(rename = "Stars")]
    stars: u64,
    #[tabled(rename = "Issues")]
    open_issues: u64,
}

pub fn print_repository(out: &mut dyn Write, repo: &RepoInfo) -> Result<()> {
    let mut table = Table::new([RepoRow {
        name: repo.full_name.clone(),
        forks: repo.forks_count,
        stars: repo.watchers_count,
        open_issues: repo.open_issues_count,
    }]);
    table.with(Style::blank());
    writeln!(out, "{}", table)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::User;

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_print_issues_truncates_titles() {
        colored::control::set_override(false);
        let issues = vec![Issue::new(12, "a".repeat(80), "alice")];

        let out = render(|out| print_issues(out, &issues, false, 20));
        assert!(out.contains(&format!("{}...", "a".repeat(17))));
        assert!(!out.contains(&"a".repeat(18)));

        let out = render(|out| print_issues(out, &issues, true, 20));
        assert!(out.contains(&"a".repeat(80)));
    }

    #[test]
    fn test_print_empty() {
        let out = render(|out| print_issues(out, &[], false, 50));
        assert_eq!(out, "No issues found\n");
    }

    #[test]
    fn test_print_issue_with_comments() {
        colored::control::set_override(false);
        let mut issue = Issue::new(3, "Crash on start", "alice");
        issue.assignee = Some(User::new("bob"));
        issue.body = Some("Steps to reproduce...".to_string());
        let comments = vec![Comment {
            id: 1,
            body: "Same here".to_string(),
            user: User::new("carol"),
            created_at: Utc::now(),
            html_url: None,
        }];

        let out = render(|out| print_issue(out, &issue, &comments, "%Y-%m-%d"));
        assert!(out.starts_with("#3 Crash on start"));
        assert!(out.contains("Assignee: bob"));
        assert!(out.contains("Steps to reproduce..."));
        assert!(out.contains("Comments (1):"));
        assert!(out.contains("Same here"));
    }

    #[test]
    fn test_print_issue_bad_date_format() {
        let issue = Issue::new(3, "Crash on start", "alice");
        let mut buf = Vec::new();
        let err = print_issue(&mut buf, &issue, &[], "%Y-%Q").unwrap_err();
        assert!(err.to_string().contains("%Y-%Q"));
    }

    #[test]
    fn test_print_repository() {
        let repo = RepoInfo {
            name: "pulls".to_string(),
            full_name: "crosby/pulls".to_string(),
            forks_count: 4,
            watchers_count: 21,
            open_issues_count: 7,
        };
        let out = render(|out| print_repository(out, &repo));
        assert!(out.contains("crosby/pulls"));
        assert!(out.contains("Stars"));
        assert!(out.contains("21"));
    }
}
