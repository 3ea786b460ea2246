#![forbid(unsafe_code)]

//! Redraw coalescing and paint orchestration.
//!
//! [`DisplayManager`] owns the active windows (paint-ordered layers),
//! the per-window redraw queue, and the layout tree. Any number of
//! windows may mark themselves dirty; the manager folds all of it into
//! a single pending "repaint now" task, armed through the injected
//! [`RepaintHook`].
//!
//! # Invariants
//!
//! 1. **One coalesced task**: at most one repaint task is armed at any
//!    time, however many windows are dirty.
//! 2. **Pacing**: consecutive repaints are at least `min_interval`
//!    apart, except the very first, which fires at the earliest
//!    requested deadline.
//! 3. **No late re-arming**: an armed repaint is never pushed later by
//!    new work, and never armed in the past.
//! 4. **Offscreen safety**: a window's `redraw` is never invoked before
//!    its first successful layout placement.

use std::collections::HashMap;

use stui_core::{Canvas, KeyEvent, Rect, Timer};
use stui_layout::{Frame, LayoutTarget, SizePolicy};
use stui_schedule::TaskQueue;

use crate::engine::EngineView;
use crate::window::{KeyOutcome, Window, WindowId};

/// Minimum interval between two coalesced repaints: 50 ms.
pub const DEFAULT_MIN_INTERVAL: Timer = Timer::from_millis(50);

/// The capability through which the manager arms its single
/// coalesced-repaint task in the application's task queue.
///
/// Injected per manager instead of living in process-wide statics, so
/// tests can instantiate isolated manager + hook fixtures.
pub trait RepaintHook {
    /// Arm (or move) the repaint task to `at`.
    fn schedule_repaint(&mut self, at: Timer);

    /// Remove the repaint task; there is no pending work.
    fn cancel_repaint(&mut self);
}

/// Applies balance results back to the window store and remembers which
/// windows just came onscreen.
struct PlacementSink<'a> {
    windows: &'a mut HashMap<WindowId, Window>,
    shown: Vec<WindowId>,
}

impl LayoutTarget<WindowId> for PlacementSink<'_> {
    fn policies(&self, key: &WindowId) -> Option<(SizePolicy, SizePolicy)> {
        let window = self.windows.get(key)?;
        window.is_active().then(|| window.policies())
    }

    fn place(&mut self, key: &WindowId, rect: Rect) {
        if let Some(window) = self.windows.get_mut(key) {
            if window.resize(rect) {
                self.shown.push(*key);
            }
        }
    }

    fn hide(&mut self, key: &WindowId) {
        if let Some(window) = self.windows.get_mut(key) {
            window.set_offscreen();
        }
    }
}

/// Owner of the window layers and the display-refresh schedule.
pub struct DisplayManager {
    windows: HashMap<WindowId, Window>,
    layers: Vec<WindowId>,
    redraws: TaskQueue<WindowId>,
    frame: Frame<WindowId>,
    next_id: u64,
    min_interval: Timer,
    last_repaint: Option<Timer>,
    armed: Option<Timer>,
    force_redraw: bool,
    layout_dirty: bool,
    focus: Option<WindowId>,
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    /// Manager with the default 50 ms repaint pacing.
    pub fn new() -> Self {
        Self::with_min_interval(DEFAULT_MIN_INTERVAL)
    }

    /// Manager with custom repaint pacing.
    pub fn with_min_interval(min_interval: Timer) -> Self {
        Self {
            windows: HashMap::new(),
            layers: Vec::new(),
            redraws: TaskQueue::new(),
            frame: Frame::empty(),
            next_id: 0,
            min_interval,
            last_repaint: None,
            armed: None,
            force_redraw: false,
            layout_dirty: false,
            focus: None,
        }
    }

    // --- window store -----------------------------------------------------

    /// Add a window on top of the paint order. The window starts
    /// inactive; activate it once it is wired into the layout.
    pub fn push_back(&mut self, window: Window) -> WindowId {
        let id = self.alloc_id();
        self.windows.insert(id, window);
        self.layers.push(id);
        id
    }

    /// Add a window at `position` in the paint order (0 = painted
    /// first). Positions past the end append.
    pub fn insert(&mut self, position: usize, window: Window) -> WindowId {
        let id = self.alloc_id();
        self.windows.insert(id, window);
        let position = position.min(self.layers.len());
        self.layers.insert(position, id);
        id
    }

    /// Remove a window entirely: its pending redraw task, its layer
    /// slot, and its focus if it had it. Returns whether it existed.
    pub fn erase(&mut self, id: WindowId, now: Timer, hook: &mut dyn RepaintHook) -> bool {
        if self.windows.remove(&id).is_none() {
            return false;
        }
        self.redraws.erase(&id);
        self.layers.retain(|&layer| layer != id);
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.layout_dirty = true;
        self.schedule_update(now, hook);
        true
    }

    /// Shared access to a window.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// Mutable access to a window (alignment, policies).
    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    /// Paint-order layer list, back to front.
    pub fn layers(&self) -> &[WindowId] {
        &self.layers
    }

    fn alloc_id(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    // --- layout -----------------------------------------------------------

    /// Install the layout tree. Takes effect at the next repaint.
    pub fn set_layout(&mut self, frame: Frame<WindowId>) {
        self.frame = frame;
        self.layout_dirty = true;
    }

    /// Request layout recomputation at the next repaint (bulk UI
    /// changes, engine-side additions).
    pub fn adjust_layout(&mut self, now: Timer, hook: &mut dyn RepaintHook) {
        self.layout_dirty = true;
        self.schedule_update(now, hook);
    }

    /// Request a full-screen erase + layout + repaint of everything
    /// (terminal resize, Ctrl-L).
    pub fn force_redraw(&mut self, now: Timer, hook: &mut dyn RepaintHook) {
        self.force_redraw = true;
        self.schedule_update(now, hook);
    }

    fn balance(&mut self, rect: Rect, now: Timer) {
        let mut sink = PlacementSink {
            windows: &mut self.windows,
            shown: Vec::new(),
        };
        self.frame.balance(rect, &mut sink);
        let shown = sink.shown;
        tracing::debug!(?rect, newly_onscreen = shown.len(), "layout balanced");
        // A window that just gained coordinates owes the screen its
        // first paint.
        for id in shown {
            self.redraws.insert(id, now);
        }
    }

    // --- activation and focus ---------------------------------------------

    /// Activate a window: it joins the layout and is queued for its
    /// first redraw (held until layout assigns coordinates).
    pub fn activate(&mut self, id: WindowId, now: Timer, hook: &mut dyn RepaintHook) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if window.is_active() {
            return;
        }
        window.set_active(true);
        self.layout_dirty = true;
        self.schedule(id, now, now, hook);
    }

    /// Deactivate a window: it leaves the layout and any pending redraw
    /// is dropped.
    pub fn deactivate(&mut self, id: WindowId, now: Timer, hook: &mut dyn RepaintHook) {
        let Some(window) = self.windows.get_mut(&id) else {
            return;
        };
        if !window.is_active() {
            return;
        }
        window.set_active(false);
        self.redraws.erase(&id);
        self.layout_dirty = true;
        self.schedule_update(now, hook);
    }

    /// Move focus to `id` (or clear it with `None`), marking the
    /// windows whose focus state changed dirty.
    pub fn set_focus(&mut self, id: Option<WindowId>, now: Timer, hook: &mut dyn RepaintHook) {
        if self.focus == id {
            return;
        }
        if let Some(old) = self.focus.take() {
            if let Some(window) = self.windows.get_mut(&old) {
                window.set_focused(false);
            }
            self.mark_dirty(old, now, hook);
        }
        if let Some(new) = id {
            if let Some(window) = self.windows.get_mut(&new) {
                window.set_focused(true);
                self.focus = Some(new);
                self.mark_dirty(new, now, hook);
            }
        }
    }

    /// Currently focused window.
    pub fn focus(&self) -> Option<WindowId> {
        self.focus
    }

    /// Cycle focus to the next active window in paint order.
    pub fn focus_next(&mut self, now: Timer, hook: &mut dyn RepaintHook) {
        let active: Vec<WindowId> = self
            .layers
            .iter()
            .copied()
            .filter(|id| self.windows.get(id).is_some_and(Window::is_active))
            .collect();
        if active.is_empty() {
            return;
        }
        let next = match self.focus.and_then(|f| active.iter().position(|&id| id == f)) {
            Some(pos) => active[(pos + 1) % active.len()],
            None => active[0],
        };
        self.set_focus(Some(next), now, hook);
    }

    /// Offer a key event to the focused window. Returns `true` when the
    /// widget consumed it (the window is then marked dirty).
    pub fn dispatch_key(
        &mut self,
        key: KeyEvent,
        engine: &dyn EngineView,
        now: Timer,
        hook: &mut dyn RepaintHook,
    ) -> bool {
        let Some(id) = self.focus else {
            return false;
        };
        let Some(window) = self.windows.get_mut(&id) else {
            return false;
        };
        if !window.is_active() {
            return false;
        }
        match window.on_key(key, engine) {
            KeyOutcome::Handled => {
                self.mark_dirty(id, now, hook);
                true
            }
            KeyOutcome::Ignored => false,
        }
    }

    // --- redraw scheduling ------------------------------------------------

    /// Request a redraw of `id` as soon as possible. No-op while the
    /// window is inactive.
    pub fn mark_dirty(&mut self, id: WindowId, now: Timer, hook: &mut dyn RepaintHook) {
        if !self.windows.get(&id).is_some_and(Window::is_active) {
            return;
        }
        self.schedule(id, now, now, hook);
    }

    /// Queue (or move) the window's redraw task to `at`, then re-arm
    /// the coalesced repaint.
    pub fn schedule(&mut self, id: WindowId, at: Timer, now: Timer, hook: &mut dyn RepaintHook) {
        self.redraws.insert(id, at);
        self.schedule_update(now, hook);
    }

    /// Drop the window's pending redraw task, then re-arm (or disarm)
    /// the coalesced repaint.
    pub fn unschedule(&mut self, id: WindowId, now: Timer, hook: &mut dyn RepaintHook) {
        self.redraws.erase(&id);
        self.schedule_update(now, hook);
    }

    fn has_pending_work(&self) -> bool {
        !self.redraws.is_empty() || self.force_redraw || self.layout_dirty
    }

    /// Re-arm the coalesced repaint task from current state.
    ///
    /// Target time is the earliest pending deadline, pushed to honor
    /// `min_interval` pacing and clamped to `now`. An arming that is
    /// already at or before the target stays put.
    pub fn schedule_update(&mut self, now: Timer, hook: &mut dyn RepaintHook) {
        if !self.has_pending_work() {
            if self.armed.take().is_some() {
                hook.cancel_repaint();
            }
            return;
        }
        let earliest = self.redraws.next_deadline().unwrap_or(now);
        let mut target = earliest.max(now);
        if let Some(last) = self.last_repaint {
            target = target.max(last + self.min_interval);
        }
        if let Some(armed) = self.armed {
            if armed <= target {
                return;
            }
        }
        tracing::debug!(target_us = target.as_micros(), "repaint armed");
        self.armed = Some(target);
        hook.schedule_repaint(target);
    }

    /// Deadline of the armed coalesced repaint, if any.
    pub fn armed_at(&self) -> Option<Timer> {
        self.armed
    }

    /// Number of windows with a pending redraw task.
    pub fn pending_redraws(&self) -> usize {
        self.redraws.len()
    }

    // --- the coalesced repaint --------------------------------------------

    /// The coalesced task body: run one full repaint pass.
    ///
    /// Order: optional full-screen invalidation, layout if needed, all
    /// due window redraws in deadline order, per-window refresh in
    /// paint order, exactly one commit, then re-arm for whatever work
    /// the pass itself produced.
    pub fn receive_update(
        &mut self,
        now: Timer,
        canvas: &mut dyn Canvas,
        engine: &dyn EngineView,
        hook: &mut dyn RepaintHook,
    ) {
        self.armed = None;

        if self.force_redraw {
            self.force_redraw = false;
            self.layout_dirty = true;
            canvas.erase_all();
            let layers: Vec<WindowId> = self.layers.clone();
            for id in layers {
                if self.windows.get(&id).is_some_and(Window::is_active) {
                    self.redraws.insert(id, now);
                }
            }
        }

        if self.layout_dirty {
            self.layout_dirty = false;
            let (cols, rows) = canvas.term_size();
            self.balance(Rect::from_size(cols, rows), now);
        }

        let Self {
            redraws, windows, ..
        } = self;
        redraws.perform(now, |queue, id| {
            let Some(window) = windows.get_mut(&id) else {
                return;
            };
            if !window.is_active() || window.is_offscreen() {
                // Stale entry: the window lost its slot between being
                // queued and firing. It re-queues when layout places it.
                return;
            }
            if let Some(next) = window.redraw(canvas, engine, now) {
                queue.insert(id, next);
            }
        });

        for id in &self.layers {
            if self
                .windows
                .get(id)
                .is_some_and(|w| w.is_active() && !w.is_offscreen())
            {
                canvas.refresh();
            }
        }
        canvas.commit();

        self.last_repaint = Some(now);
        self.schedule_update(now, hook);
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayManager, RepaintHook};
    use stui_core::Timer;

    #[derive(Default)]
    pub(crate) struct RecordingHook {
        pub scheduled: Vec<Timer>,
        pub cancels: usize,
    }

    impl RepaintHook for RecordingHook {
        fn schedule_repaint(&mut self, at: Timer) {
            self.scheduled.push(at);
        }

        fn cancel_repaint(&mut self) {
            self.cancels += 1;
        }
    }

    #[test]
    fn no_work_means_no_arming() {
        let mut manager = DisplayManager::new();
        let mut hook = RecordingHook::default();
        manager.schedule_update(Timer::from_millis(5), &mut hook);
        assert!(hook.scheduled.is_empty());
        assert_eq!(hook.cancels, 0);
        assert_eq!(manager.armed_at(), None);
    }
}
