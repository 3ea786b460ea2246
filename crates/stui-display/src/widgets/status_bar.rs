#![forbid(unsafe_code)]

//! The one-line session status bar.

use stui_core::{Attrs, Canvas, Rect, Timer};
use unicode_width::UnicodeWidthStr;

use crate::engine::EngineView;
use crate::fmt::{fmt_bytes, fmt_clock, fmt_rate};
use crate::window::{Widget, WindowFlags};

/// Aggregate rates on the left, wall clock on the right.
///
/// The periodic window of the UI: every redraw reschedules itself for
/// the next whole second so the clock ticks without anyone marking it
/// dirty.
pub struct StatusBar;

impl StatusBar {
    /// A status bar.
    pub fn new() -> Self {
        Self
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar {
    fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        _flags: WindowFlags,
        engine: &dyn EngineView,
        now: Timer,
    ) -> Option<Timer> {
        canvas.erase(area);
        let stats = engine.session();
        let left = format!(
            "D: {} ({})  U: {} ({})  peers: {}",
            fmt_rate(stats.down_rate),
            fmt_bytes(stats.down_total),
            fmt_rate(stats.up_rate),
            fmt_bytes(stats.up_total),
            stats.peers,
        );
        canvas.print_styled(area.x, area.y, &left, Attrs::DIM);

        let clock = fmt_clock(now);
        let clock_w = clock.width() as u16;
        if area.width > clock_w + left.width() as u16 {
            canvas.print(area.x + area.width - clock_w, area.y, &clock);
        }

        // Tick on the next whole second; strictly in the future even
        // when `now` sits exactly on a boundary.
        Some(now.floor_secs() + Timer::from_seconds(1))
    }
}
