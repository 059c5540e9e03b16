//! Full-screen issue list

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::style::{Color, Modifier, Style};
use std::io;
use triage_core::Issue;
use triage_term::{Line, Screen, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Down,
    Up,
    Noop,
}

fn parse_key_action(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Noop;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => KeyAction::Down,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::Up,
        _ => KeyAction::Noop,
    }
}

/// Show `issues` until the user quits
pub fn run(title: &str, issues: &[Issue], no_trunc: bool) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut screen = Screen::new(backend, Color::Reset, Color::Reset)?;
    populate(&mut screen, title, issues, no_trunc);

    screen.init()?;
    let result = event_loop(&mut screen, issues, no_trunc);
    let closed = screen.close();
    result?;
    closed?;
    Ok(())
}

fn populate<B: Backend + Surface>(
    screen: &mut Screen<B>,
    title: &str,
    issues: &[Issue],
    no_trunc: bool,
) {
    screen.header = Some(Line::styled(
        format!("{} ({} issues)", title, issues.len()),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    screen.footer = Some(Line::styled(
        "j/k scroll  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    screen.lines = issues.iter().map(|i| Line::issue_row(i, no_trunc)).collect();
}

fn event_loop<B: Backend + Surface>(
    screen: &mut Screen<B>,
    issues: &[Issue],
    no_trunc: bool,
) -> Result<()> {
    let mut offset = 0usize;
    screen.display()?;

    loop {
        match event::read()? {
            Event::Resize(_, _) => screen.resize()?,
            Event::Key(key) => {
                let next = match parse_key_action(key) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Down => (offset + 1).min(issues.len().saturating_sub(1)),
                    KeyAction::Up => offset.saturating_sub(1),
                    KeyAction::Noop => continue,
                };
                if next != offset {
                    offset = next;
                    screen.lines = issues[offset..]
                        .iter()
                        .map(|i| Line::issue_row(i, no_trunc))
                        .collect();
                    screen.display()?;
                }
            }
            _ => {}
        }
    }
}
