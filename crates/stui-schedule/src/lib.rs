#![forbid(unsafe_code)]

//! Deadline-ordered task scheduling.
//!
//! One type lives here: [`TaskQueue`], the priority queue that backs
//! both the display manager's per-window redraw pipeline and the
//! application-level coalesced-repaint arming.

mod queue;

pub use queue::TaskQueue;
