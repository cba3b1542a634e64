//! Delayed-task capability.
//!
//! DESIGN
//! ======
//! Controllers never call `setTimeout` directly. They receive a [`Scheduler`]
//! and get back an opaque handle they can cancel. In the browser the handle is
//! a `gloo_timers::callback::Timeout` (see [`crate::dom::BrowserScheduler`]);
//! in tests it is a [`ManualScheduler`] entry driven by a virtual clock, so
//! elapsed time is simulated deterministically instead of waited on.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::cell::RefCell;
use std::rc::Rc;

/// A one-shot task queued for later.
pub type Task = Box<dyn FnOnce()>;

/// Schedule and cancel one-shot delayed tasks on the current event loop.
pub trait Scheduler {
    /// Handle identifying a scheduled task.
    type Handle: 'static;

    /// Run `task` once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle;

    /// Cancel a task. Cancelling a task that already ran is a no-op.
    fn cancel(&self, handle: Self::Handle);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    type Handle = S::Handle;

    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle {
        (**self).schedule(delay_ms, task)
    }

    fn cancel(&self, handle: Self::Handle) {
        (**self).cancel(handle);
    }
}

/// Handle returned by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualHandle(u64);

struct Queued {
    id: u64,
    due_ms: u64,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now_ms: u64,
    next_id: u64,
    queue: Vec<Queued>,
}

/// Single-threaded scheduler driven by an explicit virtual clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock past a
/// task's due time. Tasks due at the same instant run in scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Number of tasks scheduled and not yet run or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Move the clock forward by `ms`, running every task that falls due.
    ///
    /// Tasks may schedule or cancel other tasks while running; anything that
    /// becomes due within the advanced window also runs.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms().saturating_add(ms);
        while let Some(queued) = self.pop_due(target) {
            (queued.task)();
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Remove the earliest task due at or before `target` and move the clock to it.
    fn pop_due(&self, target: u64) -> Option<Queued> {
        let mut state = self.state.borrow_mut();
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, q)| q.due_ms <= target)
            .min_by_key(|(_, q)| (q.due_ms, q.id))
            .map(|(i, _)| i)?;
        let queued = state.queue.remove(index);
        state.now_ms = queued.due_ms;
        Some(queued)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, task: Task) -> ManualHandle {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let due_ms = state.now_ms + u64::from(delay_ms);
        state.queue.push(Queued { id, due_ms, task });
        ManualHandle(id)
    }

    fn cancel(&self, handle: ManualHandle) {
        self.state.borrow_mut().queue.retain(|q| q.id != handle.0);
    }
}
