#![forbid(unsafe_code)]

//! The one-line title bar.

use stui_core::{Attrs, Canvas, Rect, Timer};
use unicode_width::UnicodeWidthStr;

use crate::engine::EngineView;
use crate::window::{Widget, WindowFlags};

/// Reverse-video client name banner; centered unless the window is
/// left-aligned.
pub struct TitleBar {
    title: String,
}

impl TitleBar {
    /// Banner with the given text.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Widget for TitleBar {
    fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        flags: WindowFlags,
        _engine: &dyn EngineView,
        _now: Timer,
    ) -> Option<Timer> {
        canvas.erase(area);
        let filler = " ".repeat(usize::from(area.width));
        for row in area.y..area.bottom() {
            canvas.print_styled(area.x, row, &filler, Attrs::REVERSE);
        }
        let width = usize::from(area.width);
        let text_width = self.title.width().min(width);
        let x = if flags.contains(WindowFlags::ALIGN_LEFT) {
            area.x
        } else {
            area.x + ((width - text_width) / 2) as u16
        };
        canvas.print_styled(x, area.y, &self.title, Attrs::REVERSE | Attrs::BOLD);
        None
    }
}
