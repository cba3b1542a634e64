//! Debounced section transition.
//!
//! [`SectionTransition`] keeps a binary [`Mode`] in step with whether one page
//! region is in view. Entering the region only commits the dark mode after the
//! region has stayed visible for `delay_ms`, so scrolling quickly past it never
//! flashes the page dark. Leaving the region restores the light mode at once.
//!
//! ```text
//!   Off ──visible──▶ Pending ──delay elapses──▶ On
//!    ▲                  │                        │
//!    └───── hidden ─────┴──────── hidden ────────┘
//! ```
//!
//! The pending timer lives in an `Option`, so there is never more than one.
//! Each armed timer also carries a generation number; a timer that fires after
//! being superseded finds a different generation and does nothing.

#[cfg(test)]
#[path = "transition_test.rs"]
mod transition_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::schedule::Scheduler;
use crate::visibility::VisibilitySource;

/// The page-wide presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Applies a mode to every coupled target at once.
///
/// Implementations must update all of their targets in a single call so the
/// targets can never disagree.
pub trait ModeSink {
    fn apply(&self, mode: Mode);
}

impl<M: ModeSink + ?Sized> ModeSink for Rc<M> {
    fn apply(&self, mode: Mode) {
        (**self).apply(mode);
    }
}

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Off,
    /// A commit timer is armed.
    Pending,
    On,
}

struct Pending<H> {
    handle: H,
    generation: u64,
}

struct State<H> {
    mode: Mode,
    pending: Option<Pending<H>>,
    // A fired handle is parked here until the next signal so the browser timer
    // is never torn down from inside its own callback.
    spent: Option<H>,
    generation: u64,
}

struct Shared<S: Scheduler, M> {
    scheduler: S,
    sink: M,
    delay_ms: u32,
    state: RefCell<State<S::Handle>>,
}

/// Delay-and-cancel controller for one watched region.
pub struct SectionTransition<S: Scheduler, M> {
    shared: Rc<Shared<S, M>>,
}

impl<S, M> SectionTransition<S, M>
where
    S: Scheduler + 'static,
    M: ModeSink + 'static,
{
    /// Create a controller in the `Off` phase. The sink is not touched until
    /// the first signal arrives.
    pub fn new(scheduler: S, sink: M, delay_ms: u32) -> Self {
        let state = State { mode: Mode::Light, pending: None, spent: None, generation: 0 };
        Self {
            shared: Rc::new(Shared { scheduler, sink, delay_ms, state: RefCell::new(state) }),
        }
    }

    /// Feed one visibility signal for the watched region.
    pub fn on_visibility(&self, visible: bool) {
        Shared::on_visibility(&self.shared, visible);
    }

    /// Subscribe to `source`. Signals stop when the returned guard is dropped
    /// or when this controller is dropped, whichever comes first.
    ///
    /// # Errors
    ///
    /// Returns the source's error if it cannot start watching.
    pub fn watch<V: VisibilitySource>(&self, source: &V) -> Result<V::Subscription, V::Error> {
        let weak: Weak<Shared<S, M>> = Rc::downgrade(&self.shared);
        source.subscribe(Box::new(move |visible| {
            if let Some(shared) = weak.upgrade() {
                Shared::on_visibility(&shared, visible);
            }
        }))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        let state = self.shared.state.borrow();
        match (&state.pending, state.mode) {
            (Some(_), _) => Phase::Pending,
            (None, Mode::Light) => Phase::Off,
            (None, Mode::Dark) => Phase::On,
        }
    }

    /// Mode most recently applied to the sink.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.shared.state.borrow().mode
    }

    #[must_use]
    pub fn delay_ms(&self) -> u32 {
        self.shared.delay_ms
    }
}

impl<S, M> Shared<S, M>
where
    S: Scheduler + 'static,
    M: ModeSink + 'static,
{
    fn on_visibility(this: &Rc<Self>, visible: bool) {
        let (superseded, spent) = {
            let mut state = this.state.borrow_mut();
            (state.pending.take(), state.spent.take())
        };
        drop(spent);
        if let Some(pending) = superseded {
            log::trace!("transition: cancelling pending commit #{}", pending.generation);
            this.scheduler.cancel(pending.handle);
        }

        if visible {
            Self::arm(this);
        } else {
            this.state.borrow_mut().mode = Mode::Light;
            this.sink.apply(Mode::Light);
        }
    }

    fn arm(this: &Rc<Self>) {
        let generation = {
            let mut state = this.state.borrow_mut();
            state.generation = state.generation.wrapping_add(1);
            state.generation
        };
        let weak = Rc::downgrade(this);
        let handle = this.scheduler.schedule(
            this.delay_ms,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.commit(generation);
                }
            }),
        );
        this.state.borrow_mut().pending = Some(Pending { handle, generation });
    }

    fn commit(&self, generation: u64) {
        {
            let mut state = self.state.borrow_mut();
            let current = state.pending.as_ref().is_some_and(|p| p.generation == generation);
            if !current {
                log::trace!("transition: stale commit #{generation} ignored");
                return;
            }
            state.spent = state.pending.take().map(|p| p.handle);
            state.mode = Mode::Dark;
        }
        log::debug!("transition: region stayed visible, committing dark mode");
        self.sink.apply(Mode::Dark);
    }
}
