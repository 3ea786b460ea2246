#![forbid(unsafe_code)]

//! The terminal drawing capability.
//!
//! The display stack never talks to the terminal directly; it draws
//! through the [`Canvas`] trait. Two implementations live here:
//!
//! - [`TerminalCanvas`] - a thin crossterm-backed surface that buffers
//!   escape sequences and flushes them once per [`Canvas::commit`]
//! - [`MemoryCanvas`] - an in-memory cell grid for tests (feature
//!   `test-helpers`), with counters for every pipeline operation
//!
//! # Degraded operation
//!
//! When stdout is not attached to a terminal, [`TerminalCanvas`] reports
//! a fixed 80x24 virtual size and all drawing calls become no-ops. The
//! display core keeps scheduling and laying out as usual; nothing is
//! written anywhere. This mirrors the behavior callers expect from a
//! headless run (cron, CI, detached session).

use std::fmt;
use std::io::{self, Write};

use bitflags::bitflags;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Attributes, Print, SetAttribute, SetAttributes};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::tty::IsTty;
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthChar;

use crate::geometry::Rect;

/// Virtual columns reported when no terminal is attached.
pub const VIRTUAL_COLS: u16 = 80;
/// Virtual rows reported when no terminal is attached.
pub const VIRTUAL_ROWS: u16 = 24;

bitflags! {
    /// Text attributes applied at print time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        /// Bold / increased intensity.
        const BOLD = 1 << 0;
        /// Dim / decreased intensity.
        const DIM = 1 << 1;
        /// Swap foreground and background.
        const REVERSE = 1 << 2;
        /// Underline.
        const UNDERLINE = 1 << 3;
    }
}

impl Attrs {
    fn to_crossterm(self) -> Attributes {
        let mut out = Attributes::default();
        if self.contains(Attrs::BOLD) {
            out = out.with(Attribute::Bold);
        }
        if self.contains(Attrs::DIM) {
            out = out.with(Attribute::Dim);
        }
        if self.contains(Attrs::REVERSE) {
            out = out.with(Attribute::Reverse);
        }
        if self.contains(Attrs::UNDERLINE) {
            out = out.with(Attribute::Underlined);
        }
        out
    }
}

/// The drawing surface consumed by windows and the display manager.
///
/// All operations are synchronous and infallible from the caller's point
/// of view; implementations absorb or log environmental failures.
pub trait Canvas {
    /// Current surface size as `(columns, rows)`.
    fn term_size(&self) -> (u16, u16);

    /// Record a new surface size (e.g. after a terminal resize event).
    fn resize(&mut self, columns: u16, rows: u16);

    /// Blank a rectangular region.
    fn erase(&mut self, area: Rect);

    /// Blank the whole surface.
    fn erase_all(&mut self);

    /// Print text starting at `(x, y)`, clipped to the surface edge by
    /// display width.
    fn print(&mut self, x: u16, y: u16, text: &str);

    /// Print text with attributes, clipped like [`Canvas::print`].
    fn print_styled(&mut self, x: u16, y: u16, text: &str, attrs: Attrs);

    /// Prepare one window's on-screen representation. Called once per
    /// active window in paint order before [`Canvas::commit`].
    fn refresh(&mut self);

    /// Flush everything drawn since the last commit to the terminal.
    /// The display manager issues exactly one commit per repaint pass.
    fn commit(&mut self);
}

/// Error raised while entering or leaving the terminal session.
#[derive(Debug)]
pub enum SessionError {
    /// An I/O failure from the underlying terminal calls.
    Io(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal session: {err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// RAII guard for raw mode + alternate screen.
///
/// [`TerminalSession::enter`] switches the terminal into the state the UI
/// needs; dropping the guard (or calling [`TerminalSession::restore`])
/// puts it back. Restoration also runs on drop so a panicking caller
/// does not leave the user's shell in raw mode.
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen, hiding the cursor.
    ///
    /// On a detached stdout this is a no-op that still returns a guard,
    /// matching the canvas degradation policy.
    pub fn enter() -> Result<Self, SessionError> {
        if !io::stdout().is_tty() {
            tracing::info!("stdout is not a tty; session runs detached");
            return Ok(Self { active: false });
        }
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        tracing::info!("terminal session entered");
        Ok(Self { active: true })
    }

    /// Leave the alternate screen and restore cooked mode.
    pub fn restore(&mut self) -> Result<(), SessionError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(io::stdout(), LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        tracing::info!("terminal session restored");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "failed to restore terminal on drop");
        }
    }
}

/// Crossterm-backed canvas writing to stdout.
///
/// Escape sequences accumulate in an internal buffer; [`Canvas::commit`]
/// performs the single write + flush per repaint pass.
pub struct TerminalCanvas {
    buf: Vec<u8>,
    cols: u16,
    rows: u16,
    attached: bool,
}

impl TerminalCanvas {
    /// Probe the terminal and build a canvas.
    ///
    /// Falls back to the detached 80x24 virtual surface when stdout is
    /// not a tty or the size query fails.
    pub fn new() -> Self {
        let attached = io::stdout().is_tty();
        let (cols, rows) = if attached {
            crossterm::terminal::size().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "terminal size query failed, using virtual size");
                (VIRTUAL_COLS, VIRTUAL_ROWS)
            })
        } else {
            (VIRTUAL_COLS, VIRTUAL_ROWS)
        };
        Self {
            buf: Vec::new(),
            cols,
            rows,
            attached,
        }
    }

    /// Whether a real terminal is attached.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Clip `text` so it fits between `x` and the right edge, cutting on
    /// display-width boundaries (wide glyphs never straddle the edge).
    fn clip<'t>(&self, x: u16, text: &'t str) -> &'t str {
        let budget = usize::from(self.cols.saturating_sub(x));
        let mut used = 0;
        for (idx, ch) in text.char_indices() {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                return &text[..idx];
            }
            used += w;
        }
        text
    }
}

impl Default for TerminalCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for TerminalCanvas {
    fn term_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.cols = columns;
        self.rows = rows;
    }

    fn erase(&mut self, area: Rect) {
        if !self.attached {
            return;
        }
        let area = area.intersection(&Rect::from_size(self.cols, self.rows));
        if area.is_empty() {
            return;
        }
        let blank = " ".repeat(usize::from(area.width));
        for row in area.y..area.bottom() {
            let _ = queue!(self.buf, MoveTo(area.x, row), Print(&blank));
        }
    }

    fn erase_all(&mut self) {
        if !self.attached {
            return;
        }
        let _ = queue!(self.buf, Clear(ClearType::All));
    }

    fn print(&mut self, x: u16, y: u16, text: &str) {
        if !self.attached || y >= self.rows || x >= self.cols {
            return;
        }
        let clipped = self.clip(x, text);
        let _ = queue!(self.buf, MoveTo(x, y), Print(clipped));
    }

    fn print_styled(&mut self, x: u16, y: u16, text: &str, attrs: Attrs) {
        if !self.attached || y >= self.rows || x >= self.cols {
            return;
        }
        let clipped = self.clip(x, text);
        let _ = queue!(
            self.buf,
            SetAttributes(attrs.to_crossterm()),
            MoveTo(x, y),
            Print(clipped),
            SetAttribute(Attribute::Reset)
        );
    }

    fn refresh(&mut self) {
        // Buffered surface: per-window refresh has nothing to prepare.
    }

    fn commit(&mut self) {
        if !self.attached {
            self.buf.clear();
            return;
        }
        let mut out = io::stdout();
        if let Err(err) = out.write_all(&self.buf).and_then(|_| out.flush()) {
            tracing::warn!(error = %err, "terminal flush failed, dropping frame");
        }
        self.buf.clear();
    }
}

/// In-memory canvas for tests.
///
/// Stores one `char` plus [`Attrs`] per cell and counts refresh/commit
/// calls so tests can assert the exact shape of a repaint pass.
#[cfg(any(test, feature = "test-helpers"))]
pub struct MemoryCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<char>,
    attrs: Vec<Attrs>,
    /// Number of [`Canvas::refresh`] calls.
    pub refresh_count: usize,
    /// Number of [`Canvas::commit`] calls.
    pub commit_count: usize,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryCanvas {
    /// Create a blank canvas of the given size.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![' '; usize::from(cols) * usize::from(rows)],
            attrs: vec![Attrs::empty(); usize::from(cols) * usize::from(rows)],
            refresh_count: 0,
            commit_count: 0,
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.cols) + usize::from(x)
    }

    /// Character at `(x, y)`; space when out of bounds.
    pub fn cell(&self, x: u16, y: u16) -> char {
        if x >= self.cols || y >= self.rows {
            return ' ';
        }
        self.cells[self.idx(x, y)]
    }

    /// Attributes at `(x, y)`.
    pub fn cell_attrs(&self, x: u16, y: u16) -> Attrs {
        if x >= self.cols || y >= self.rows {
            return Attrs::empty();
        }
        self.attrs[self.idx(x, y)]
    }

    /// One row rendered as a `String`, trailing spaces included.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.cols).map(|x| self.cell(x, y)).collect()
    }

    fn put(&mut self, x: u16, y: u16, text: &str, attrs: Attrs) {
        if y >= self.rows {
            return;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.cols {
                break;
            }
            let idx = self.idx(col, y);
            self.cells[idx] = ch;
            self.attrs[idx] = attrs;
            col += 1;
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Canvas for MemoryCanvas {
    fn term_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.cols = columns;
        self.rows = rows;
        self.cells = vec![' '; usize::from(columns) * usize::from(rows)];
        self.attrs = vec![Attrs::empty(); usize::from(columns) * usize::from(rows)];
    }

    fn erase(&mut self, area: Rect) {
        let area = area.intersection(&Rect::from_size(self.cols, self.rows));
        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                let idx = self.idx(col, row);
                self.cells[idx] = ' ';
                self.attrs[idx] = Attrs::empty();
            }
        }
    }

    fn erase_all(&mut self) {
        self.cells.fill(' ');
        self.attrs.fill(Attrs::empty());
    }

    fn print(&mut self, x: u16, y: u16, text: &str) {
        self.put(x, y, text, Attrs::empty());
    }

    fn print_styled(&mut self, x: u16, y: u16, text: &str, attrs: Attrs) {
        self.put(x, y, text, attrs);
    }

    fn refresh(&mut self) {
        self.refresh_count += 1;
    }

    fn commit(&mut self) {
        self.commit_count += 1;
    }
}
