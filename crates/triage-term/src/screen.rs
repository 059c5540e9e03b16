//! Full-screen canvas
//!
//! Lifecycle is `Uninitialized -> Ready -> Closed`. [`Screen::init`] takes
//! over the terminal once; [`Screen::close`] hands it back and may be called
//! any number of times. Dropping a screen closes it, so every exit path
//! restores the user's terminal.
//!
//! Frames are painted into ratatui's back buffer and flushed as a diff, so
//! the terminal only ever shows complete frames.

use crate::line::Line;
use crate::surface::Surface;
use crate::{RenderError, Result};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    Uninitialized,
    Ready,
    Closed,
}

pub struct Screen<B: Backend + Surface> {
    terminal: Terminal<B>,
    pub width: u16,
    pub height: u16,
    pub fg: Color,
    pub bg: Color,
    pub header: Option<Line>,
    pub footer: Option<Line>,
    pub lines: Vec<Line>,
    state: ScreenState,
}

impl<B: Backend + Surface> Screen<B> {
    /// Wrap `backend`, capturing its current size
    pub fn new(backend: B, fg: Color, bg: Color) -> Result<Self> {
        let terminal = Terminal::new(backend)?;
        let size = terminal.backend().size()?;
        Ok(Self {
            terminal,
            width: size.width,
            height: size.height,
            fg,
            bg,
            header: None,
            footer: None,
            lines: Vec::new(),
            state: ScreenState::Uninitialized,
        })
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }

    /// Take over the terminal. Allowed exactly once.
    pub fn init(&mut self) -> Result<()> {
        match self.state {
            ScreenState::Ready => return Err(RenderError::AlreadyInitialized),
            ScreenState::Closed => return Err(RenderError::Closed),
            ScreenState::Uninitialized => {}
        }

        if let Err(err) = self.terminal.backend_mut().enter() {
            // raw mode may already be on
            let _ = self.terminal.backend_mut().restore();
            return Err(err.into());
        }
        self.state = ScreenState::Ready;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Give the terminal back. Safe to call repeatedly.
    pub fn close(&mut self) -> Result<()> {
        let was = self.state;
        self.state = ScreenState::Closed;
        if was != ScreenState::Ready {
            return Ok(());
        }

        tracing::debug!("restoring terminal");
        let restored = self.terminal.backend_mut().restore();
        let cursor = self.terminal.show_cursor();
        restored?;
        cursor?;
        Ok(())
    }

    fn ready(&self) -> Result<()> {
        match self.state {
            ScreenState::Ready => Ok(()),
            ScreenState::Uninitialized => Err(RenderError::NotInitialized),
            ScreenState::Closed => Err(RenderError::Closed),
        }
    }

    fn default_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Fill the whole canvas with the default colors
    pub fn clear(&mut self) -> Result<()> {
        self.ready()?;
        let style = self.default_style();
        let buf = self.terminal.current_buffer_mut();
        let area = buf.area;
        buf.reset();
        buf.set_style(area, style);
        Ok(())
    }

    /// Paint header, body and footer, then flush the frame.
    ///
    /// Body lines that start below the last row are skipped. The footer is
    /// always painted last on the bottom row and wins over any body line
    /// there.
    pub fn display(&mut self) -> Result<()> {
        self.clear()?;

        let style = self.default_style();
        let height = self.height;
        let mut canvas = Canvas::new(self.terminal.current_buffer_mut(), style);

        let mut row: u16 = 0;
        if let Some(header) = &self.header {
            if row < height {
                header.render(row, 0, &mut canvas)?;
            }
            row = row.saturating_add(header.rows());
        }

        for line in &self.lines {
            if row >= height {
                break;
            }
            line.render(row, 0, &mut canvas)?;
            row = row.saturating_add(line.rows());
        }

        if let Some(footer) = &self.footer
            && height > 0
        {
            let last = height - 1;
            canvas.clear_row(last)?;
            footer.render(last, 0, &mut canvas)?;
        }

        self.terminal.flush()?;
        self.terminal.swap_buffers();
        Backend::flush(self.terminal.backend_mut())?;
        Ok(())
    }

    /// Re-read the terminal size and repaint from scratch
    pub fn resize(&mut self) -> Result<()> {
        self.ready()?;
        let size = self.terminal.backend().size()?;
        tracing::debug!(width = size.width, height = size.height, "terminal resized");
        self.width = size.width;
        self.height = size.height;
        self.terminal
            .resize(Rect::new(0, 0, size.width, size.height))?;
        self.display()
    }
}

impl<B: Backend + Surface> Drop for Screen<B> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

/// The drawing surface of a [`Screen`] for one frame.
///
/// Writes are clipped at the right edge; rows outside the screen are an
/// error.
pub struct Canvas<'a> {
    buf: &'a mut Buffer,
    style: Style,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut Buffer, style: Style) -> Self {
        Self { buf, style }
    }

    pub fn width(&self) -> u16 {
        self.buf.area.width
    }

    pub fn height(&self) -> u16 {
        self.buf.area.height
    }

    fn check_row(&self, row: u16) -> Result<()> {
        if row >= self.height() {
            return Err(RenderError::RowOutOfBounds {
                row,
                height: self.height(),
            });
        }
        Ok(())
    }

    /// Reset `row` to the default colors
    pub fn clear_row(&mut self, row: u16) -> Result<()> {
        self.check_row(row)?;
        let area = self.buf.area;
        let line = Rect::new(area.x, area.y + row, area.width, 1);
        for y in line.top()..line.bottom() {
            for x in line.left()..line.right() {
                self.buf[(x, y)].reset();
            }
        }
        self.buf.set_style(line, self.style);
        Ok(())
    }

    /// Write `text` at (`row`, `column`), returning the columns used
    pub fn put(&mut self, row: u16, column: u16, text: &str, style: Style) -> Result<u16> {
        self.check_row(row)?;
        let width = self.width();
        if column >= width {
            return Ok(0);
        }
        let area = self.buf.area;
        let max = usize::from(width - column);
        let (end, _) = self
            .buf
            .set_stringn(area.x + column, area.y + row, text, max, style);
        Ok(end - (area.x + column))
    }
}
