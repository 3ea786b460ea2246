#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! The run loop consumes only what the presentation layer reacts to:
//! key presses and terminal resizes. Everything else crossterm can
//! report (mouse, paste, focus) is dropped at the mapping boundary.

use bitflags::bitflags;
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press (or repeat).
    Key(KeyEvent),
    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl Event {
    /// Map a crossterm event into a canonical [`Event`].
    ///
    /// Returns `None` for event kinds this layer does not consume and
    /// for key releases.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) if key.kind != cte::KeyEventKind::Release => {
                Some(Event::Key(KeyEvent {
                    code: KeyCode::from_crossterm(key.code)?,
                    modifiers: Modifiers::from_crossterm(key.modifiers),
                }))
            }
            cte::Event::Resize(width, height) => Some(Event::Resize { width, height }),
            _ => None,
        }
    }
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Plain key press without modifiers.
    #[inline]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// `Ctrl` + character chord.
    #[inline]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is the given character with no modifiers.
    #[inline]
    pub fn is_char(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.is_empty()
    }
}

/// Key identity, independent of modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter / return.
    Enter,
    /// Escape.
    Esc,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Delete.
    Delete,
    /// Function key.
    F(u8),
}

impl KeyCode {
    fn from_crossterm(code: cte::KeyCode) -> Option<Self> {
        Some(match code {
            cte::KeyCode::Char(c) => KeyCode::Char(c),
            cte::KeyCode::Enter => KeyCode::Enter,
            cte::KeyCode::Esc => KeyCode::Esc,
            cte::KeyCode::Backspace => KeyCode::Backspace,
            cte::KeyCode::Tab => KeyCode::Tab,
            cte::KeyCode::Up => KeyCode::Up,
            cte::KeyCode::Down => KeyCode::Down,
            cte::KeyCode::Left => KeyCode::Left,
            cte::KeyCode::Right => KeyCode::Right,
            cte::KeyCode::PageUp => KeyCode::PageUp,
            cte::KeyCode::PageDown => KeyCode::PageDown,
            cte::KeyCode::Home => KeyCode::Home,
            cte::KeyCode::End => KeyCode::End,
            cte::KeyCode::Delete => KeyCode::Delete,
            cte::KeyCode::F(n) => KeyCode::F(n),
            _ => return None,
        })
    }
}

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / meta.
        const ALT = 1 << 2;
    }
}

impl Modifiers {
    fn from_crossterm(mods: cte::KeyModifiers) -> Self {
        let mut out = Modifiers::empty();
        if mods.contains(cte::KeyModifiers::SHIFT) {
            out |= Modifiers::SHIFT;
        }
        if mods.contains(cte::KeyModifiers::CONTROL) {
            out |= Modifiers::CTRL;
        }
        if mods.contains(cte::KeyModifiers::ALT) {
            out |= Modifiers::ALT;
        }
        out
    }
}
