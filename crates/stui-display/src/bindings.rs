#![forbid(unsafe_code)]

//! Global key bindings.
//!
//! Keys are offered to the focused window first; whatever it ignores is
//! looked up here. Bindings map exact chords (code + modifiers) to
//! actions.

use std::collections::HashMap;

use stui_core::{KeyCode, KeyEvent};

/// Application-level actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Leave the run loop.
    Quit,
    /// Full-screen erase + layout + repaint (Ctrl-L).
    ForceRedraw,
    /// Cycle focus through the active windows.
    FocusNext,
}

/// A chord-to-action map.
pub struct Bindings<A> {
    map: HashMap<KeyEvent, A>,
}

impl<A> Default for Bindings<A> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
        }
    }
}

impl<A: Copy> Bindings<A> {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `chord` to `action`, replacing any previous binding.
    pub fn bind(&mut self, chord: KeyEvent, action: A) -> &mut Self {
        self.map.insert(chord, action);
        self
    }

    /// Remove a binding. Returns the action it carried, if any.
    pub fn unbind(&mut self, chord: &KeyEvent) -> Option<A> {
        self.map.remove(chord)
    }

    /// Action bound to `chord`, if any.
    pub fn lookup(&self, chord: &KeyEvent) -> Option<A> {
        self.map.get(chord).copied()
    }

    /// Number of bound chords.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no chords are bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The stock torrent-client keymap.
pub fn default_bindings() -> Bindings<UiAction> {
    let mut bindings = Bindings::new();
    bindings
        .bind(KeyEvent::plain(KeyCode::Char('q')), UiAction::Quit)
        .bind(KeyEvent::ctrl('c'), UiAction::Quit)
        .bind(KeyEvent::ctrl('l'), UiAction::ForceRedraw)
        .bind(KeyEvent::plain(KeyCode::Tab), UiAction::FocusNext);
    bindings
}
