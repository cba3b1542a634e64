//! Navbar shrink on scroll.
//!
//! The class is written on every scroll event rather than only on change:
//! the write is idempotent and the navbar element may have been swapped out
//! since the previous event.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

/// Decides whether the navbar should carry its "scrolled" class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavbarShrink {
    threshold: f64,
}

impl NavbarShrink {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Whether a vertical scroll offset is strictly past the threshold.
    #[must_use]
    pub fn is_scrolled(&self, scroll_y: f64) -> bool {
        scroll_y > self.threshold
    }
}
