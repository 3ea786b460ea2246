#![forbid(unsafe_code)]

//! Windows, redraw coalescing, and the cooperative run loop.
//!
//! This crate is the control core of the presentation layer:
//!
//! - [`Window`] / [`Widget`] - the drawable-surface state machine
//! - [`DisplayManager`] - paint-order layers, the per-window redraw
//!   queue, and the single coalesced-repaint task
//! - [`EngineView`] - the read-only accessor surface of the torrent
//!   engine, consumed inside `redraw` bodies only
//! - [`widgets`] - the concrete windows of a torrent client UI
//! - [`UiRuntime`] - input dispatch plus the outer poll/perform loop

pub mod bindings;
pub mod engine;
pub mod fmt;
pub mod manager;
pub mod runtime;
pub mod widgets;
pub mod window;

pub use bindings::{Bindings, UiAction, default_bindings};
pub use engine::{
    DownloadSnapshot, DownloadState, EngineEvent, EngineView, SessionStats, StubEngine,
};
pub use manager::{DEFAULT_MIN_INTERVAL, DisplayManager, RepaintHook};
pub use runtime::{ENGINE_POLL_INTERVAL, UiRuntime, UiTask};
pub use window::{KeyOutcome, Widget, Window, WindowFlags, WindowId};
