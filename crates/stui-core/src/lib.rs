#![forbid(unsafe_code)]

//! Leaf primitives for the swarmtui display stack.
//!
//! This crate deliberately has no knowledge of windows, layout, or
//! scheduling. It provides:
//!
//! - [`Timer`] - monotonic-ordering microsecond time values
//! - [`Rect`] - cell-coordinate rectangles
//! - [`Canvas`] - the terminal drawing capability and its implementations
//! - [`Event`] - canonical input events mapped from crossterm

pub mod canvas;
pub mod event;
pub mod geometry;
pub mod timer;

pub use canvas::{Attrs, Canvas, SessionError, TerminalCanvas, TerminalSession};
pub use event::{Event, KeyCode, KeyEvent, Modifiers};
pub use geometry::Rect;
pub use timer::Timer;

#[cfg(any(test, feature = "test-helpers"))]
pub use canvas::MemoryCanvas;
