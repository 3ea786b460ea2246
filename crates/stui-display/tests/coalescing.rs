//! Redraw coalescing and offscreen safety, observed through a recording
//! hook and a counting widget.

use std::cell::RefCell;
use std::rc::Rc;

use stui_core::{Canvas, MemoryCanvas, Rect, Timer};
use stui_display::{
    DisplayManager, EngineView, RepaintHook, StubEngine, Widget, Window, WindowFlags, WindowId,
};
use stui_layout::{Frame, SizePolicy};

#[derive(Default)]
struct RecordingHook {
    scheduled: Vec<Timer>,
    cancels: usize,
}

impl RepaintHook for RecordingHook {
    fn schedule_repaint(&mut self, at: Timer) {
        self.scheduled.push(at);
    }

    fn cancel_repaint(&mut self) {
        self.cancels += 1;
    }
}

/// Records every redraw call; optionally self-reschedules.
struct CountingWidget {
    calls: Rc<RefCell<Vec<(Rect, Timer)>>>,
    period: Option<Timer>,
}

impl CountingWidget {
    fn new(calls: Rc<RefCell<Vec<(Rect, Timer)>>>) -> Self {
        Self {
            calls,
            period: None,
        }
    }

    fn periodic(calls: Rc<RefCell<Vec<(Rect, Timer)>>>, period: Timer) -> Self {
        Self {
            calls,
            period: Some(period),
        }
    }
}

impl Widget for CountingWidget {
    fn redraw(
        &mut self,
        _canvas: &mut dyn Canvas,
        area: Rect,
        _flags: WindowFlags,
        _engine: &dyn EngineView,
        now: Timer,
    ) -> Option<Timer> {
        self.calls.borrow_mut().push((area, now));
        self.period.map(|p| now + p)
    }
}

fn counting_window() -> (Window, Rc<RefCell<Vec<(Rect, Timer)>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let window = Window::new(
        CountingWidget::new(calls.clone()),
        SizePolicy::FILL,
        SizePolicy::fill_min(1),
    );
    (window, calls)
}

fn ms(n: i64) -> Timer {
    Timer::from_millis(n)
}

#[test]
fn dirty_windows_coalesce_into_one_arming() {
    // N windows dirty in the same tick: exactly one repaint task, armed
    // at the earliest requested deadline, not delayed by min_interval
    // before the first repaint.
    let mut manager = DisplayManager::new();
    let mut ids: Vec<WindowId> = Vec::new();
    for _ in 0..3 {
        let (window, _) = counting_window();
        ids.push(manager.push_back(window));
    }
    let mut hook = RecordingHook::default();
    let t0 = ms(100);
    for &id in &ids {
        manager.activate(id, t0, &mut hook);
    }

    assert_eq!(hook.scheduled, vec![t0]);
    assert_eq!(manager.armed_at(), Some(t0));
    assert_eq!(manager.pending_redraws(), 3);
}

#[test]
fn repeated_mark_dirty_does_not_rearm() {
    let mut manager = DisplayManager::new();
    let (window, _) = counting_window();
    let id = manager.push_back(window);
    let mut hook = RecordingHook::default();
    let t0 = ms(100);
    manager.activate(id, t0, &mut hook);
    manager.mark_dirty(id, t0 + ms(5), &mut hook);
    manager.mark_dirty(id, t0 + ms(10), &mut hook);

    // One arming, still at the original deadline.
    assert_eq!(hook.scheduled, vec![t0]);
    assert_eq!(manager.armed_at(), Some(t0));
}

#[test]
fn min_interval_paces_consecutive_repaints() {
    let mut manager = DisplayManager::new();
    let (window, calls) = counting_window();
    let id = manager.push_back(window);
    manager.set_layout(Frame::rows(vec![Frame::window(id)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(40, 10);
    let engine = StubEngine::new();

    let t0 = ms(1_000);
    manager.activate(id, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);
    assert_eq!(calls.borrow().len(), 1);

    // New dirt right after the repaint: armed at last + 50 ms, not at
    // the requested time.
    let t1 = t0 + ms(1);
    manager.mark_dirty(id, t1, &mut hook);
    assert_eq!(manager.armed_at(), Some(t0 + ms(50)));

    // And never pushed later by more dirt.
    manager.mark_dirty(id, t0 + ms(30), &mut hook);
    assert_eq!(manager.armed_at(), Some(t0 + ms(50)));
}

#[test]
fn offscreen_window_is_never_drawn() {
    // The window is activated and marked dirty but has no layout slot:
    // its redraw must not run. Once the layout places it, the pass
    // draws it exactly once with its real rectangle.
    let mut manager = DisplayManager::new();
    let (window, calls) = counting_window();
    let id = manager.push_back(window);

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(40, 10);
    let engine = StubEngine::new();

    let t0 = ms(100);
    manager.activate(id, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);
    assert!(calls.borrow().is_empty());
    assert!(manager.window(id).expect("window exists").is_offscreen());

    let t1 = t0 + ms(60);
    manager.set_layout(Frame::rows(vec![Frame::window(id)]));
    manager.adjust_layout(t1, &mut hook);
    manager.receive_update(t1, &mut canvas, &engine, &mut hook);

    let calls = calls.borrow();
    assert_eq!(calls.as_slice(), &[(Rect::from_size(40, 10), t1)]);
    assert!(!manager.window(id).expect("window exists").is_offscreen());
}

#[test]
fn one_commit_and_paint_order_refresh_per_pass() {
    let mut manager = DisplayManager::new();
    let (first, _) = counting_window();
    let (second, _) = counting_window();
    let a = manager.push_back(first);
    let b = manager.push_back(second);
    manager.set_layout(Frame::rows(vec![Frame::window(a), Frame::window(b)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(40, 10);
    let engine = StubEngine::new();

    let t0 = ms(100);
    manager.activate(a, t0, &mut hook);
    manager.activate(b, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);

    assert_eq!(canvas.commit_count, 1);
    assert_eq!(canvas.refresh_count, 2);
}

#[test]
fn deactivation_disarms_the_repaint() {
    let mut manager = DisplayManager::new();
    let (window, _) = counting_window();
    let id = manager.push_back(window);
    let mut hook = RecordingHook::default();
    let t0 = ms(100);
    manager.activate(id, t0, &mut hook);
    assert_eq!(manager.armed_at(), Some(t0));

    manager.deactivate(id, t0 + ms(1), &mut hook);
    // Layout work remains pending (the window left the layout), so the
    // repaint stays armed; dropping that too disarms.
    manager.receive_update(t0 + ms(1), &mut canvas_sink(), &StubEngine::new(), &mut hook);
    assert_eq!(manager.armed_at(), None);
    assert_eq!(manager.pending_redraws(), 0);
}

fn canvas_sink() -> MemoryCanvas {
    MemoryCanvas::new(10, 4)
}

#[test]
fn unschedule_without_other_work_cancels() {
    let mut manager = DisplayManager::new();
    let (window, calls) = counting_window();
    let id = manager.push_back(window);
    manager.set_layout(Frame::rows(vec![Frame::window(id)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(20, 5);
    let engine = StubEngine::new();
    let t0 = ms(100);
    manager.activate(id, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);
    assert_eq!(calls.borrow().len(), 1);

    let t1 = t0 + ms(60);
    manager.mark_dirty(id, t1, &mut hook);
    assert!(manager.armed_at().is_some());
    manager.unschedule(id, t1, &mut hook);
    assert_eq!(manager.armed_at(), None);
    assert_eq!(hook.cancels, 1);
}

#[test]
fn periodic_widget_keeps_the_cycle_alive() {
    let mut manager = DisplayManager::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let window = Window::new(
        CountingWidget::periodic(calls.clone(), Timer::from_seconds(1)),
        SizePolicy::FILL,
        SizePolicy::fill_min(1),
    );
    let id = manager.push_back(window);
    manager.set_layout(Frame::rows(vec![Frame::window(id)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(20, 5);
    let engine = StubEngine::new();

    let t0 = Timer::from_seconds(10);
    manager.activate(id, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);

    // The widget rescheduled itself a second out; the manager re-armed
    // for it without anyone calling mark_dirty.
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(manager.pending_redraws(), 1);
    assert_eq!(manager.armed_at(), Some(t0 + Timer::from_seconds(1)));

    let t1 = t0 + Timer::from_seconds(1);
    manager.receive_update(t1, &mut canvas, &engine, &mut hook);
    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(manager.armed_at(), Some(t1 + Timer::from_seconds(1)));
}

#[test]
fn force_redraw_invalidates_every_active_window() {
    let mut manager = DisplayManager::new();
    let (first, calls_a) = counting_window();
    let (second, calls_b) = counting_window();
    let a = manager.push_back(first);
    let b = manager.push_back(second);
    manager.set_layout(Frame::rows(vec![Frame::window(a), Frame::window(b)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(40, 10);
    let engine = StubEngine::new();

    let t0 = ms(100);
    manager.activate(a, t0, &mut hook);
    manager.activate(b, t0, &mut hook);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);
    assert_eq!((calls_a.borrow().len(), calls_b.borrow().len()), (1, 1));

    // Quiet screen, then a force: both windows repaint.
    let t1 = t0 + ms(200);
    manager.force_redraw(t1, &mut hook);
    assert_eq!(manager.armed_at(), Some(t1));
    manager.receive_update(t1, &mut canvas, &engine, &mut hook);
    assert_eq!((calls_a.borrow().len(), calls_b.borrow().len()), (2, 2));
}

#[test]
fn erased_window_leaves_no_dangling_task() {
    let mut manager = DisplayManager::new();
    let (window, calls) = counting_window();
    let id = manager.push_back(window);
    manager.set_layout(Frame::rows(vec![Frame::window(id)]));

    let mut hook = RecordingHook::default();
    let mut canvas = MemoryCanvas::new(20, 5);
    let engine = StubEngine::new();
    let t0 = ms(100);
    manager.activate(id, t0, &mut hook);
    assert_eq!(manager.pending_redraws(), 1);

    manager.erase(id, t0, &mut hook);
    assert_eq!(manager.pending_redraws(), 0);
    manager.receive_update(t0, &mut canvas, &engine, &mut hook);
    assert!(calls.borrow().is_empty());
}
