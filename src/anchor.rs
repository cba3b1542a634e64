//! Smooth scrolling for in-page anchor links.
//!
//! The page has a fixed navbar, so jumping straight to a section would hide
//! its heading underneath it. Clicks on `a[href^="#"]` are intercepted and the
//! window scrolls to the target's document offset minus the navbar height and
//! a small gap.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

/// Where to scroll, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub top: f64,
    pub smooth: bool,
}

/// Geometry read from the page at click time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    /// Target's top edge relative to the viewport (`getBoundingClientRect().top`).
    pub viewport_top: f64,
    /// Current vertical scroll offset of the window.
    pub scroll_y: f64,
    /// Rendered navbar height, or `None` when the navbar is absent.
    pub navbar_height: Option<f64>,
}

/// Anchor click policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorScroll {
    pub fallback_navbar_height: f64,
    pub gap: f64,
}

impl AnchorScroll {
    #[must_use]
    pub fn new(fallback_navbar_height: f64, gap: f64) -> Self {
        Self { fallback_navbar_height, gap }
    }

    /// The selector to resolve for an anchor's `href`.
    ///
    /// A bare `#` (or an empty href) names no target, so there is nothing to
    /// scroll to.
    #[must_use]
    pub fn target_selector(href: &str) -> Option<&str> {
        (href.len() > 1).then_some(href)
    }

    /// Document offset that puts the target just below the navbar.
    #[must_use]
    pub fn scroll_top(&self, geometry: TargetGeometry) -> f64 {
        let navbar_height = geometry.navbar_height.unwrap_or(self.fallback_navbar_height);
        geometry.viewport_top + geometry.scroll_y - navbar_height - self.gap
    }

    /// Full decision for a click: `None` when there is nowhere to go.
    ///
    /// `locate` is only consulted for hrefs that name a target and returns the
    /// target's geometry, or `None` when no element matches.
    pub fn resolve<F>(&self, href: &str, locate: F) -> Option<ScrollCommand>
    where
        F: FnOnce(&str) -> Option<TargetGeometry>,
    {
        let selector = Self::target_selector(href)?;
        let geometry = locate(selector)?;
        Some(ScrollCommand { top: self.scroll_top(geometry), smooth: true })
    }
}
