//! Terminal mode switching
//!
//! A backend that owns a real terminal enters raw mode and the alternate
//! screen on [`Surface::enter`] and undoes both on [`Surface::restore`].

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{CrosstermBackend, TestBackend};
use std::io::{self, Write};

pub trait Surface {
    fn enter(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
}

impl<W: Write> Surface for CrosstermBackend<W> {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(self, EnterAlternateScreen)
    }

    fn restore(&mut self) -> io::Result<()> {
        let screen = execute!(self, LeaveAlternateScreen);
        disable_raw_mode()?;
        screen
    }
}

/// In-memory backend, nothing to switch
impl Surface for TestBackend {
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        Ok(())
    }
}
