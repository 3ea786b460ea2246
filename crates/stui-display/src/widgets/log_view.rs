#![forbid(unsafe_code)]

//! Recent engine history lines.

use stui_core::{Canvas, Rect, Timer};

use crate::engine::EngineView;
use crate::fmt::fmt_clock;
use crate::window::{Widget, WindowFlags};

/// Timestamped engine events, oldest first.
///
/// With a bottom-aligned window the newest line hugs the bottom edge
/// and short histories leave the top blank; otherwise lines render from
/// the top.
pub struct LogView;

impl LogView {
    /// A log view.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for LogView {
    fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        flags: WindowFlags,
        engine: &dyn EngineView,
        _now: Timer,
    ) -> Option<Timer> {
        canvas.erase(area);
        let events = engine.recent_events(usize::from(area.height));
        let pad = if flags.contains(WindowFlags::ALIGN_BOTTOM) {
            usize::from(area.height) - events.len()
        } else {
            0
        };
        for (i, event) in events.iter().enumerate() {
            let y = area.y + (pad + i) as u16;
            let line = format!("[{}] {}", fmt_clock(event.at), event.message);
            canvas.print(area.x, y, &line);
        }
        None
    }
}
