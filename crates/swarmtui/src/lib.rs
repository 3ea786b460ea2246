#![forbid(unsafe_code)]

//! swarmtui public facade.
//!
//! Re-exports the stable surface of the internal crates so applications
//! depend on one name. The pieces compose like this: build a
//! [`DisplayManager`], push [`Window`]s wrapping [`widgets`], install a
//! [`Frame`] layout, then hand everything to a [`UiRuntime`] driving a
//! [`TerminalCanvas`] against your engine's [`EngineView`].

use std::fmt;
use std::io;

// --- Core re-exports -------------------------------------------------------

pub use stui_core::{
    Attrs, Canvas, Event, KeyCode, KeyEvent, Modifiers, Rect, SessionError, TerminalCanvas,
    TerminalSession, Timer,
};

// --- Scheduling re-exports -------------------------------------------------

pub use stui_schedule::TaskQueue;

// --- Layout re-exports -----------------------------------------------------

pub use stui_layout::{Dir, Frame, LayoutTarget, PolicyError, SizePolicy};

// --- Display re-exports ----------------------------------------------------

pub use stui_display::widgets;
pub use stui_display::{
    Bindings, DEFAULT_MIN_INTERVAL, DisplayManager, DownloadSnapshot, DownloadState, EngineEvent,
    EngineView, KeyOutcome, RepaintHook, SessionStats, StubEngine, UiAction, UiRuntime, UiTask,
    Widget, Window, WindowFlags, WindowId, default_bindings,
};

// --- Errors ----------------------------------------------------------------

/// Top-level error type for swarmtui applications.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(io::Error),
    /// Failure entering or leaving the terminal session.
    Session(SessionError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}
