#![forbid(unsafe_code)]

//! The main download list.

use stui_core::{Attrs, Canvas, KeyCode, KeyEvent, Rect, Timer};

use crate::engine::EngineView;
use crate::fmt::{fmt_percent, fmt_rate, pad_to_width, right_align};
use crate::window::{KeyOutcome, Widget, WindowFlags};

// Fixed column widths; the name column absorbs the rest.
const DONE_W: usize = 7;
const RATE_W: usize = 12;
const PEERS_W: usize = 8;
const STATE_W: usize = 5;

/// One row per download with a cursor selection.
///
/// Event-driven: the engine poll marks it dirty; it never reschedules
/// itself.
pub struct DownloadList {
    selected: usize,
    offset: usize,
}

impl Default for DownloadList {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadList {
    /// List with the cursor on the first row.
    pub fn new() -> Self {
        Self {
            selected: 0,
            offset: 0,
        }
    }

    /// Index of the selected download.
    pub fn selected(&self) -> usize {
        self.selected
    }

    fn move_selection(&mut self, delta: isize, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        let last = count - 1;
        self.selected = self
            .selected
            .min(last)
            .saturating_add_signed(delta)
            .min(last);
    }
}

impl Widget for DownloadList {
    fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        flags: WindowFlags,
        engine: &dyn EngineView,
        _now: Timer,
    ) -> Option<Timer> {
        canvas.erase(area);
        if area.height == 0 {
            return None;
        }

        let fixed = DONE_W + RATE_W * 2 + PEERS_W + STATE_W;
        let name_w = usize::from(area.width).saturating_sub(fixed).max(8);
        let header = format!(
            "{}{}{}{}{}",
            pad_to_width("name", name_w),
            right_align("done", DONE_W),
            right_align("down", RATE_W),
            right_align("up", RATE_W),
            right_align("peers", PEERS_W),
        );
        canvas.print_styled(area.x, area.y, &header, Attrs::UNDERLINE);

        let rows = usize::from(area.height.saturating_sub(1));
        let downloads = engine.downloads();
        if downloads.is_empty() || rows == 0 {
            return None;
        }
        self.selected = self.selected.min(downloads.len() - 1);

        // Keep the cursor visible.
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + rows {
            self.offset = self.selected - rows + 1;
        }

        for (slot, (index, download)) in downloads
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(rows)
            .enumerate()
        {
            let line = format!(
                "{}{}{}{}{} {}",
                pad_to_width(&download.name, name_w),
                right_align(&fmt_percent(download.completion()), DONE_W),
                right_align(&fmt_rate(download.down_rate), RATE_W),
                right_align(&fmt_rate(download.up_rate), RATE_W),
                right_align(&format!("{}/{}", download.seeds, download.peers), PEERS_W),
                download.state.label(),
            );
            let attrs = if index == self.selected {
                if flags.contains(WindowFlags::FOCUSED) {
                    Attrs::REVERSE
                } else {
                    Attrs::BOLD
                }
            } else {
                Attrs::empty()
            };
            let y = area.y + 1 + slot as u16;
            canvas.print_styled(area.x, y, &line, attrs);
        }
        None
    }

    fn on_key(&mut self, key: KeyEvent, engine: &dyn EngineView) -> KeyOutcome {
        if !key.modifiers.is_empty() {
            return KeyOutcome::Ignored;
        }
        let count = engine.download_count();
        match key.code {
            KeyCode::Up => self.move_selection(-1, count),
            KeyCode::Down => self.move_selection(1, count),
            KeyCode::PageUp => self.move_selection(-10, count),
            KeyCode::PageDown => self.move_selection(10, count),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = count.saturating_sub(1),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }
}
