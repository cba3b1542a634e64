//! Visibility signals.
//!
//! A [`VisibilitySource`] reports whether one watched region is currently in
//! view. Subscribing hands back a guard; dropping the guard unsubscribes. The
//! browser source wraps an `IntersectionObserver`
//! ([`crate::dom::IntersectionSource`]); [`ManualSource`] is the fake used to
//! drive controllers without a rendering surface.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::{Rc, Weak};

/// Callback receiving "is currently visible" signals.
pub type VisibilityCallback = Box<dyn FnMut(bool)>;

/// Something that can report visibility changes for a single region.
pub trait VisibilitySource {
    /// Guard that keeps the subscription alive. Dropping it unsubscribes.
    type Subscription;
    type Error;

    /// Start delivering visibility signals to `on_change`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the underlying watcher cannot be created.
    fn subscribe(&self, on_change: VisibilityCallback) -> Result<Self::Subscription, Self::Error>;
}

type Listeners = RefCell<Vec<(u64, VisibilityCallback)>>;

/// Visibility source whose signals are emitted by hand.
///
/// Subscribing or unsubscribing from inside a callback is not supported.
#[derive(Default)]
pub struct ManualSource {
    listeners: Rc<Listeners>,
    next_id: Cell<u64>,
}

impl ManualSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a visibility signal to every live subscriber.
    pub fn emit(&self, visible: bool) {
        for (_, callback) in self.listeners.borrow_mut().iter_mut() {
            callback(visible);
        }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl VisibilitySource for ManualSource {
    type Subscription = ManualSubscription;
    type Error = Infallible;

    fn subscribe(&self, on_change: VisibilityCallback) -> Result<ManualSubscription, Infallible> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, on_change));
        Ok(ManualSubscription { id, listeners: Rc::downgrade(&self.listeners) })
    }
}

/// Subscription guard for [`ManualSource`].
pub struct ManualSubscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Drop for ManualSubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
