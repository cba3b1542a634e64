//! Default selectors, class names, and thresholds for the landing page.

// ── Navbar ──────────────────────────────────────────────────────

/// Element id of the fixed navbar.
pub const NAVBAR_ID: &str = "navbar";

/// Class added to the navbar once the page has scrolled past the threshold.
pub const SCROLLED_CLASS: &str = "scrolled";

/// Vertical scroll offset (CSS pixels) past which the navbar counts as scrolled.
pub const NAVBAR_SCROLL_THRESHOLD_PX: f64 = 50.0;

// ── Anchors ─────────────────────────────────────────────────────

/// Links whose click is intercepted for smooth in-page scrolling.
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Navbar height assumed when the navbar element is absent.
pub const FALLBACK_NAVBAR_HEIGHT_PX: f64 = 80.0;

/// Breathing room left between the navbar and the scrolled-to section.
pub const ANCHOR_GAP_PX: f64 = 10.0;

// ── Hero reveal ─────────────────────────────────────────────────

pub const HERO_SELECTORS: [&str; 3] = [".hero-badge", ".hero-title", ".hero-cta"];
pub const REVEAL_CLASS: &str = "is-visible";
pub const HERO_THRESHOLD: f64 = 0.1;
pub const HERO_ROOT_MARGIN: &str = "0px 0px -50px 0px";

// ── Dark transition ─────────────────────────────────────────────

/// The section whose visibility drives the dark mode.
pub const TRANSITION_SECTION_SELECTOR: &str = ".problem-section";
pub const DARK_MODE_CLASS: &str = "dark-mode";

/// Time the section must stay visible before dark mode commits.
pub const TRANSITION_DELAY_MS: u32 = 200;
pub const TRANSITION_THRESHOLD: f64 = 0.3;
pub const TRANSITION_ROOT_MARGIN: &str = "0px 0px -100px 0px";

// ── Section animations ──────────────────────────────────────────

pub const SECTION_SELECTORS: [&str; 8] = [
    ".nessuna-sorpresa-section .animated-path",
    ".nessuna-sorpresa-section .process-card",
    ".nessuna-sorpresa-section .float-element",
    ".ai-section .ai-typing",
    ".ai-section .ai-process-flow",
    ".ai-section .ai-final-statement",
    ".ai-section .user-message",
    ".ai-section .ai-message",
];
pub const PLAY_ANIMATION_CLASS: &str = "play-animation";
pub const SECTION_THRESHOLD: f64 = 0.15;
pub const SECTION_ROOT_MARGIN: &str = "0px";
