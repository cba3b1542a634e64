//! One-shot reveal tracking.
//!
//! Elements start out watched. The first time an element is reported as
//! intersecting it is handed back to the caller (who adds the reveal class and
//! stops observing it) and forgotten, so later exits and re-entries never
//! replay its animation.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

/// Set of elements still waiting for their first intersection.
///
/// `K` is whatever identifies an element: a `web_sys::Element` in the
/// browser, plain ids in tests. Lookups are linear, which is fine for the
/// handful of elements a page section animates.
#[derive(Debug, Clone)]
pub struct RevealTracker<K> {
    watched: Vec<K>,
}

impl<K> Default for RevealTracker<K> {
    fn default() -> Self {
        Self { watched: Vec::new() }
    }
}

impl<K: PartialEq> RevealTracker<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `key`. Returns `false` if it is already watched.
    pub fn track(&mut self, key: K) -> bool {
        if self.watched.contains(&key) {
            return false;
        }
        self.watched.push(key);
        true
    }

    #[must_use]
    pub fn is_tracked(&self, key: &K) -> bool {
        self.watched.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Process one batch of `(element, is_intersecting)` entries.
    ///
    /// Returns the elements to reveal now, in entry order. Each returned
    /// element is no longer tracked. Entries for untracked elements and
    /// non-intersecting entries are ignored.
    pub fn on_entries<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = (K, bool)>,
    {
        let mut revealed = Vec::new();
        for (key, intersecting) in entries {
            if !intersecting {
                continue;
            }
            if let Some(index) = self.watched.iter().position(|k| *k == key) {
                revealed.push(self.watched.swap_remove(index));
            }
        }
        revealed
    }
}

impl<K: PartialEq> FromIterator<K> for RevealTracker<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut tracker = Self::new();
        for key in iter {
            tracker.track(key);
        }
        tracker
    }
}
