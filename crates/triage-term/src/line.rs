//! Renderable screen lines

use crate::Result;
use crate::screen::Canvas;
use crate::text::fit;
use ratatui::style::{Color, Modifier, Style};
use triage_core::Issue;

/// Minimum width of the `#number` column on issue rows
pub const NUMBER_COLS: u16 = 8;
/// Width of the assignee column, including its leading gap
pub const ASSIGNEE_COLS: u16 = 16;
/// Narrower rows drop the assignee column
pub const MIN_WIDTH_FOR_ASSIGNEE: u16 = 40;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One renderable unit of a [`crate::Screen`]
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Plain {
        text: String,
        style: Style,
    },
    /// `#number  title  assignee` on a single row
    IssueRow {
        number: u64,
        title: String,
        assignee: String,
        no_trunc: bool,
    },
    /// Several rows describing one issue
    IssueDetail {
        issue: Box<Issue>,
        no_trunc: bool,
    },
}

impl Line {
    pub fn plain(text: impl Into<String>) -> Self {
        Line::Plain {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Line::Plain {
            text: text.into(),
            style,
        }
    }

    pub fn issue_row(issue: &Issue, no_trunc: bool) -> Self {
        Line::IssueRow {
            number: issue.number,
            title: issue.title.clone(),
            assignee: issue.assignee_login().to_string(),
            no_trunc,
        }
    }

    pub fn issue_detail(issue: &Issue, no_trunc: bool) -> Self {
        Line::IssueDetail {
            issue: Box::new(issue.clone()),
            no_trunc,
        }
    }

    /// Rows this line occupies
    pub fn rows(&self) -> u16 {
        match self {
            Line::Plain { .. } | Line::IssueRow { .. } => 1,
            Line::IssueDetail { .. } => 4,
        }
    }

    /// Paint this line starting at (`row`, `column`). Text never wraps;
    /// anything past the right edge or the last row is clipped.
    pub fn render(&self, row: u16, column: u16, canvas: &mut Canvas<'_>) -> Result<()> {
        match self {
            Line::Plain { text, style } => {
                canvas.put(row, column, text, *style)?;
            }
            Line::IssueRow {
                number,
                title,
                assignee,
                no_trunc,
            } => {
                let avail = canvas.width().saturating_sub(column);
                let label = format!("#{}", number);
                canvas.put(row, column, &label, Style::default().fg(Color::Cyan))?;

                // long numbers widen the column, keeping one blank after them
                let label_cols = u16::try_from(label.len()).unwrap_or(u16::MAX);
                let number_cols = NUMBER_COLS.max(label_cols.saturating_add(1));
                let title_col = column.saturating_add(number_cols);
                let budget = title_budget(avail).saturating_sub(number_cols - NUMBER_COLS);
                let used = canvas.put(
                    row,
                    title_col,
                    &fit(title, usize::from(budget), *no_trunc),
                    Style::default(),
                )?;

                if avail >= MIN_WIDTH_FOR_ASSIGNEE && !assignee.is_empty() {
                    // untruncated titles push the assignee right
                    let gap = if *no_trunc { used.max(budget) } else { budget };
                    let assignee_col = title_col.saturating_add(gap).saturating_add(1);
                    canvas.put(
                        row,
                        assignee_col,
                        &fit(assignee, usize::from(ASSIGNEE_COLS - 1), *no_trunc),
                        Style::default().fg(Color::Yellow),
                    )?;
                }
            }
            Line::IssueDetail { issue, no_trunc } => {
                let budget = usize::from(canvas.width().saturating_sub(column));
                let assignee = if issue.is_assigned() {
                    format!("assigned to {}", issue.assignee_login())
                } else {
                    "unassigned".to_string()
                };
                let labels = issue.label_names();
                let labels = if labels.is_empty() {
                    "none".to_string()
                } else {
                    labels.join(", ")
                };

                let rows = [
                    (
                        format!("#{} {}", issue.number, issue.title),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    (
                        format!("{} · by {} · {}", issue.state, issue.author.login, assignee),
                        Style::default().fg(Color::Cyan),
                    ),
                    (format!("labels: {}", labels), Style::default()),
                    (
                        format!(
                            "created {} · updated {}",
                            issue.created_at.format(DATE_FORMAT),
                            issue.updated_at.format(DATE_FORMAT)
                        ),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];

                for (offset, (text, style)) in (0u16..).zip(rows) {
                    let r = row.saturating_add(offset);
                    // the first row is the caller's responsibility
                    if offset > 0 && r >= canvas.height() {
                        break;
                    }
                    canvas.put(r, column, &fit(&text, budget, *no_trunc), style)?;
                }
            }
        }
        Ok(())
    }
}

/// Title column width for an issue row `width` columns wide
pub fn title_budget(width: u16) -> u16 {
    let assignee = if width >= MIN_WIDTH_FOR_ASSIGNEE {
        ASSIGNEE_COLS
    } else {
        0
    };
    width.saturating_sub(NUMBER_COLS).saturating_sub(assignee)
}
