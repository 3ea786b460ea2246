#![forbid(unsafe_code)]

//! The cooperative run loop.
//!
//! One logical thread alternates between waiting for the next deadline
//! or input event and executing whatever came due. Waiting happens only
//! here, at the outer boundary; nothing inside the display core blocks.
//!
//! [`UiRuntime::step`] is the pure heart: it takes the current time and
//! an optional input event, dispatches, and drains the application task
//! queue. [`UiRuntime::run`] wraps it with `crossterm::event::poll`,
//! using "time until the next deadline" as the poll timeout.

use std::io;
use std::time::Duration;

use stui_core::{Canvas, Event, Timer};
use stui_schedule::TaskQueue;

use crate::bindings::{Bindings, UiAction};
use crate::engine::EngineView;
use crate::manager::{DisplayManager, RepaintHook};
use crate::window::WindowId;

/// How often watched windows are refreshed from engine data.
pub const ENGINE_POLL_INTERVAL: Timer = Timer::from_seconds(1);

/// Poll timeout when nothing is scheduled at all.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Application-level scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiTask {
    /// The single coalesced repaint (armed by the display manager).
    Repaint,
    /// Periodic engine sampling: mark watched windows dirty.
    PollEngine,
}

/// [`RepaintHook`] over the application task queue: the manager's
/// coalesced task is one keyed entry, so re-arming can never duplicate
/// it.
struct QueueHook<'a>(&'a mut TaskQueue<UiTask>);

impl RepaintHook for QueueHook<'_> {
    fn schedule_repaint(&mut self, at: Timer) {
        self.0.insert(UiTask::Repaint, at);
    }

    fn cancel_repaint(&mut self) {
        self.0.erase(&UiTask::Repaint);
    }
}

/// Input dispatch plus the outer poll/perform loop.
pub struct UiRuntime {
    manager: DisplayManager,
    tasks: TaskQueue<UiTask>,
    bindings: Bindings<UiAction>,
    watched: Vec<WindowId>,
    quit: bool,
}

impl UiRuntime {
    /// Wrap a configured manager and keymap.
    pub fn new(manager: DisplayManager, bindings: Bindings<UiAction>) -> Self {
        Self {
            manager,
            tasks: TaskQueue::new(),
            bindings,
            watched: Vec::new(),
            quit: false,
        }
    }

    /// The display manager (window store, focus, layout).
    pub fn manager(&self) -> &DisplayManager {
        &self.manager
    }

    /// Mutable access for wiring windows and layout.
    pub fn manager_mut(&mut self) -> &mut DisplayManager {
        &mut self.manager
    }

    /// Mark `id` dirty on every engine poll tick (windows whose data
    /// source is the engine rather than input events).
    pub fn watch(&mut self, id: WindowId) {
        if !self.watched.contains(&id) {
            self.watched.push(id);
        }
    }

    /// Ask the loop to exit after the current step.
    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Whether quit has been requested.
    pub fn quitting(&self) -> bool {
        self.quit
    }

    /// Deadline of the next scheduled task, if any.
    pub fn next_deadline(&self) -> Option<Timer> {
        self.tasks.next_deadline()
    }

    /// Activate a window, routing schedule traffic through the
    /// runtime's task queue.
    pub fn activate(&mut self, id: WindowId, now: Timer) {
        let Self { manager, tasks, .. } = self;
        manager.activate(id, now, &mut QueueHook(tasks));
    }

    /// Deactivate a window.
    pub fn deactivate(&mut self, id: WindowId, now: Timer) {
        let Self { manager, tasks, .. } = self;
        manager.deactivate(id, now, &mut QueueHook(tasks));
    }

    /// Move focus (or clear it with `None`).
    pub fn set_focus(&mut self, id: Option<WindowId>, now: Timer) {
        let Self { manager, tasks, .. } = self;
        manager.set_focus(id, now, &mut QueueHook(tasks));
    }

    /// Arm the first paint and the engine poll cycle.
    pub fn start(&mut self, now: Timer) {
        let Self { manager, tasks, .. } = self;
        manager.force_redraw(now, &mut QueueHook(&mut *tasks));
        tasks.insert(UiTask::PollEngine, now + ENGINE_POLL_INTERVAL);
    }

    /// One turn of the loop: dispatch `event`, then run everything due
    /// at `now`. Returns `false` once quit has been requested.
    pub fn step(
        &mut self,
        now: Timer,
        event: Option<Event>,
        canvas: &mut dyn Canvas,
        engine: &dyn EngineView,
    ) -> bool {
        if let Some(event) = event {
            self.dispatch(event, now, canvas, engine);
        }

        let Self {
            manager,
            tasks,
            watched,
            ..
        } = self;
        tasks.perform(now, |queue, task| match task {
            UiTask::Repaint => {
                manager.receive_update(now, canvas, engine, &mut QueueHook(queue));
            }
            UiTask::PollEngine => {
                let mut hook = QueueHook(queue);
                for &id in watched.iter() {
                    manager.mark_dirty(id, now, &mut hook);
                }
                hook.0.insert(UiTask::PollEngine, now + ENGINE_POLL_INTERVAL);
            }
        });

        !self.quit
    }

    fn dispatch(&mut self, event: Event, now: Timer, canvas: &mut dyn Canvas, engine: &dyn EngineView) {
        match event {
            Event::Key(key) => {
                let consumed = {
                    let Self { manager, tasks, .. } = self;
                    manager.dispatch_key(key, engine, now, &mut QueueHook(tasks))
                };
                if consumed {
                    return;
                }
                match self.bindings.lookup(&key) {
                    Some(UiAction::Quit) => {
                        tracing::info!("quit requested");
                        self.quit = true;
                    }
                    Some(UiAction::ForceRedraw) => {
                        let Self { manager, tasks, .. } = self;
                        manager.force_redraw(now, &mut QueueHook(tasks));
                    }
                    Some(UiAction::FocusNext) => {
                        let Self { manager, tasks, .. } = self;
                        manager.focus_next(now, &mut QueueHook(tasks));
                    }
                    None => {}
                }
            }
            Event::Resize { width, height } => {
                tracing::debug!(width, height, "terminal resized");
                canvas.resize(width, height);
                let Self { manager, tasks, .. } = self;
                manager.force_redraw(now, &mut QueueHook(tasks));
            }
        }
    }

    /// Drive the loop against a real terminal until quit.
    ///
    /// Blocks in `crossterm::event::poll` for at most the time until
    /// the next deadline (or half a second when nothing is scheduled).
    pub fn run(&mut self, canvas: &mut dyn Canvas, engine: &dyn EngineView) -> io::Result<()> {
        self.start(Timer::now());
        loop {
            let now = Timer::now();
            let timeout = match self.tasks.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_since(now);
                    Duration::from_micros(wait.as_micros() as u64)
                }
                None => IDLE_POLL,
            };
            let event = if crossterm::event::poll(timeout)? {
                Event::from_crossterm(crossterm::event::read()?)
            } else {
                None
            };
            if !self.step(Timer::now(), event, canvas, engine) {
                return Ok(());
            }
        }
    }
}
