#![forbid(unsafe_code)]

//! The window state machine.
//!
//! A [`Window`] wraps one [`Widget`] with activation, visibility, and
//! focus state plus per-axis size policies. Windows move through three
//! states:
//!
//! ```text
//! inactive --set_active(true)--> active-offscreen --layout--> active-onscreen
//! ```
//!
//! The offscreen flag is cleared by a successful layout placement, never
//! by the window itself; until then the manager must not invoke
//! `redraw` (the window has no valid coordinates). Deactivation from
//! either active state unschedules any pending redraw.
//!
//! A widget reschedules itself by *returning* its next deadline from
//! `redraw`. The display manager is not reachable from inside a redraw
//! body, so the classic footgun of marking a window dirty while it is
//! being drawn (an unbounded redraw loop) cannot be written.

use std::fmt;

use bitflags::bitflags;
use stui_core::{Canvas, KeyEvent, Rect, Timer};
use stui_layout::SizePolicy;

use crate::engine::EngineView;

/// Identifier of a window inside one [`crate::DisplayManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

bitflags! {
    /// Window state and alignment flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowFlags: u8 {
        /// The window participates in layout and painting.
        const ACTIVE = 1 << 0;
        /// No valid screen coordinates yet; drawing is forbidden.
        const OFFSCREEN = 1 << 1;
        /// The window receives key input first.
        const FOCUSED = 1 << 2;
        /// Widget content anchors to the left edge instead of centering.
        const ALIGN_LEFT = 1 << 3;
        /// Widget content anchors to the bottom of the area.
        const ALIGN_BOTTOM = 1 << 4;
    }
}

/// Whether a widget consumed a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The widget reacted; the manager marks it dirty.
    Handled,
    /// Not interested; the event falls through to global bindings.
    Ignored,
}

/// Per-type drawing and input logic hosted inside a [`Window`].
pub trait Widget {
    /// Erase the window's region and repaint it from current data.
    ///
    /// Returns the deadline at which the window wants to be redrawn
    /// next, or `None` for purely event-driven windows. The engine view
    /// is read-only; a redraw must not block or mutate engine state.
    fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        flags: WindowFlags,
        engine: &dyn EngineView,
        now: Timer,
    ) -> Option<Timer>;

    /// Offer a key event to the widget while its window is focused.
    fn on_key(&mut self, _key: KeyEvent, _engine: &dyn EngineView) -> KeyOutcome {
        KeyOutcome::Ignored
    }
}

/// One rectangular UI surface with its own redraw logic.
pub struct Window {
    widget: Box<dyn Widget>,
    flags: WindowFlags,
    width: SizePolicy,
    height: SizePolicy,
    area: Rect,
}

impl Window {
    /// Wrap a widget with size policies. The window starts inactive.
    pub fn new(widget: impl Widget + 'static, width: SizePolicy, height: SizePolicy) -> Self {
        Self {
            widget: Box::new(widget),
            flags: WindowFlags::OFFSCREEN,
            width,
            height,
            area: Rect::default(),
        }
    }

    /// Current flag set.
    #[inline]
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Whether the window participates in layout and painting.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.flags.contains(WindowFlags::ACTIVE)
    }

    /// Whether the window still lacks valid screen coordinates.
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.flags.contains(WindowFlags::OFFSCREEN)
    }

    /// Whether the window currently receives key input first.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.flags.contains(WindowFlags::FOCUSED)
    }

    /// Rectangle from the most recent layout placement.
    #[inline]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// `(width, height)` size policies.
    #[inline]
    pub fn policies(&self) -> (SizePolicy, SizePolicy) {
        (self.width, self.height)
    }

    /// Anchor widget content to the left edge.
    pub fn set_left_aligned(&mut self, on: bool) {
        self.flags.set(WindowFlags::ALIGN_LEFT, on);
    }

    /// Anchor widget content to the bottom of the area.
    pub fn set_bottom_aligned(&mut self, on: bool) {
        self.flags.set(WindowFlags::ALIGN_BOTTOM, on);
    }

    pub(crate) fn set_active(&mut self, on: bool) {
        if on {
            self.flags.insert(WindowFlags::ACTIVE | WindowFlags::OFFSCREEN);
        } else {
            self.flags.remove(WindowFlags::ACTIVE);
            self.flags.insert(WindowFlags::OFFSCREEN);
        }
    }

    pub(crate) fn set_focused(&mut self, on: bool) {
        self.flags.set(WindowFlags::FOCUSED, on);
    }

    /// Apply a layout placement. Returns `true` when this placement
    /// brought the window onscreen (its first valid coordinates since
    /// activation).
    ///
    /// Zero-area placements are a layout bug, not an input condition;
    /// the solver hides clipped windows instead of placing them.
    pub(crate) fn resize(&mut self, area: Rect) -> bool {
        assert!(
            !area.is_empty(),
            "window resized to zero area {area:?}; clipped windows must be hidden"
        );
        self.area = area;
        let was_offscreen = self.flags.contains(WindowFlags::OFFSCREEN);
        self.flags.remove(WindowFlags::OFFSCREEN);
        was_offscreen
    }

    /// Push the window back offscreen (clipped out of the layout).
    pub(crate) fn set_offscreen(&mut self) {
        self.flags.insert(WindowFlags::OFFSCREEN);
    }

    pub(crate) fn redraw(
        &mut self,
        canvas: &mut dyn Canvas,
        engine: &dyn EngineView,
        now: Timer,
    ) -> Option<Timer> {
        debug_assert!(self.is_active() && !self.is_offscreen());
        self.widget.redraw(canvas, self.area, self.flags, engine, now)
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, engine: &dyn EngineView) -> KeyOutcome {
        self.widget.on_key(key, engine)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyOutcome, Widget, Window, WindowFlags};
    use crate::engine::{EngineView, StubEngine};
    use stui_core::{Canvas, MemoryCanvas, Rect, Timer};
    use stui_layout::SizePolicy;

    struct Nop;

    impl Widget for Nop {
        fn redraw(
            &mut self,
            _canvas: &mut dyn Canvas,
            _area: Rect,
            _flags: WindowFlags,
            _engine: &dyn EngineView,
            _now: Timer,
        ) -> Option<Timer> {
            None
        }
    }

    fn window() -> Window {
        Window::new(Nop, SizePolicy::FILL, SizePolicy::fill_min(1))
    }

    #[test]
    fn starts_inactive_and_offscreen() {
        let win = window();
        assert!(!win.is_active());
        assert!(win.is_offscreen());
        assert!(!win.is_focused());
    }

    #[test]
    fn activation_sets_offscreen_until_placed() {
        let mut win = window();
        win.set_active(true);
        assert!(win.is_active());
        assert!(win.is_offscreen());

        let first = win.resize(Rect::new(0, 0, 10, 5));
        assert!(first);
        assert!(!win.is_offscreen());
        assert_eq!(win.area(), Rect::new(0, 0, 10, 5));

        let again = win.resize(Rect::new(0, 0, 12, 5));
        assert!(!again);
    }

    #[test]
    fn deactivation_returns_to_offscreen() {
        let mut win = window();
        win.set_active(true);
        win.resize(Rect::new(0, 0, 10, 5));
        win.set_active(false);
        assert!(!win.is_active());
        assert!(win.is_offscreen());
    }

    #[test]
    #[should_panic(expected = "zero area")]
    fn zero_area_resize_is_fatal() {
        let mut win = window();
        win.set_active(true);
        win.resize(Rect::new(0, 0, 0, 5));
    }

    #[test]
    fn default_on_key_ignores() {
        let mut win = window();
        let engine = StubEngine::new();
        let key = stui_core::KeyEvent::plain(stui_core::event::KeyCode::Char('x'));
        assert_eq!(win.on_key(key, &engine), KeyOutcome::Ignored);
    }

    #[test]
    fn alignment_flags_round_trip() {
        let mut win = window();
        win.set_left_aligned(true);
        win.set_bottom_aligned(true);
        assert!(win.flags().contains(WindowFlags::ALIGN_LEFT));
        assert!(win.flags().contains(WindowFlags::ALIGN_BOTTOM));
        win.set_left_aligned(false);
        assert!(!win.flags().contains(WindowFlags::ALIGN_LEFT));
    }

    #[test]
    fn redraw_delegates_with_area() {
        struct Probe {
            saw: std::rc::Rc<std::cell::Cell<Rect>>,
        }
        impl Widget for Probe {
            fn redraw(
                &mut self,
                _canvas: &mut dyn Canvas,
                area: Rect,
                _flags: WindowFlags,
                _engine: &dyn EngineView,
                _now: Timer,
            ) -> Option<Timer> {
                self.saw.set(area);
                None
            }
        }

        let saw = std::rc::Rc::new(std::cell::Cell::new(Rect::default()));
        let mut win = Window::new(
            Probe { saw: saw.clone() },
            SizePolicy::FILL,
            SizePolicy::fill_min(1),
        );
        win.set_active(true);
        win.resize(Rect::new(2, 3, 20, 4));

        let mut canvas = MemoryCanvas::new(40, 10);
        let engine = StubEngine::new();
        win.redraw(&mut canvas, &engine, Timer::ZERO);
        assert_eq!(saw.get(), Rect::new(2, 3, 20, 4));
    }
}
