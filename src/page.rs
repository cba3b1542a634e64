//! Page installer and `wasm-bindgen` entry points.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host page loads the wasm module, which calls [`start`] on
//! instantiation. Installation waits for `DOMContentLoaded` (or runs at once
//! if the document has already parsed) and wires all five behaviours.
//!
//! Each behaviour degrades on its own: a missing element skips only the
//! behaviour that needs it, and a failing browser call is logged and skips
//! only that behaviour. Nothing is ever surfaced to the visitor.
//!
//! The installed [`LandingPage`] owns every listener, observer, and timer. It
//! is kept in a thread-local slot for the lifetime of the page; replacing it
//! (via `installWithConfig`) or calling `uninstall` drops the old one, which
//! removes its listeners, disconnects its observers, and takes dark mode off.
//!
//! Every install request or uninstall starts a new epoch. A mount still
//! waiting for `DOMContentLoaded` only runs if its epoch is current.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, Window};

use crate::anchor::AnchorScroll;
use crate::config::{AnchorConfig, FxConfig, NavbarConfig, RevealConfig, TransitionConfig};
use crate::dom::{self, BrowserScheduler, ClassPair, DomError, IntersectionSource, Listener, Observer};
use crate::navbar::NavbarShrink;
use crate::reveal::RevealTracker;
use crate::transition::{Phase, SectionTransition};

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

thread_local! {
    static INSTALLED: RefCell<Option<LandingPage>> = const { RefCell::new(None) };
    static EPOCH: Cell<u64> = const { Cell::new(0) };
}

// ── Entry points ────────────────────────────────────────────────

/// Module start hook: set up logging and install with the default config.
#[wasm_bindgen(start)]
pub fn start() {
    init_logging();
    if let Err(err) = install_when_ready(FxConfig::default()) {
        log::warn!("landing effects not installed: {err}");
    }
}

/// Replace the installed effects with ones built from a JSON config.
///
/// Omitted sections keep their defaults. Invalid config is rejected before
/// anything already installed is touched.
///
/// # Errors
///
/// Returns `Err` if the JSON is invalid or the page has no window or document.
#[wasm_bindgen(js_name = installWithConfig)]
pub fn install_with_config(json: &str) -> Result<(), JsError> {
    let config = FxConfig::from_json(json)?;
    install_when_ready(config)?;
    Ok(())
}

/// Remove every listener and observer installed so far, take dark mode off,
/// and cancel an install still waiting for `DOMContentLoaded`.
#[wasm_bindgen]
pub fn uninstall() {
    next_epoch();
    let previous = INSTALLED.with(RefCell::take);
    if previous.is_some() {
        log::info!("landing effects uninstalled");
    }
}

/// Supersede any deferred mount and return the new epoch.
fn next_epoch() -> u64 {
    EPOCH.with(|epoch| {
        let next = epoch.get().wrapping_add(1);
        epoch.set(next);
        next
    })
}

fn is_current(epoch: u64) -> bool {
    EPOCH.with(|current| current.get() == epoch)
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Install once the document has been parsed.
///
/// # Errors
///
/// Returns `Err` if there is no window or document, or the ready listener
/// cannot be registered.
pub fn install_when_ready(config: FxConfig) -> Result<(), DomError> {
    let document = dom::document(&dom::window()?)?;
    let epoch = next_epoch();
    if document.ready_state() != "loading" {
        return mount(&config);
    }

    let ready = Closure::once_into_js(move || {
        if !is_current(epoch) {
            log::debug!("deferred install superseded, skipped");
            return;
        }
        if let Err(err) = mount(&config) {
            log::warn!("landing effects not installed: {err}");
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    document
        .add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            ready.unchecked_ref(),
            &options,
        )
        .map_err(|e| DomError::js("addEventListener", &e))
}

fn mount(config: &FxConfig) -> Result<(), DomError> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let page = LandingPage::install(&window, &document, config);
    log::info!(
        "landing effects installed: [{}], {} elements awaiting reveal, transition {:?}",
        page.active_behaviours().join(", "),
        page.unrevealed(),
        page.transition_phase(),
    );
    let previous = INSTALLED.with(|slot| slot.replace(Some(page)));
    drop(previous);
    Ok(())
}

// ── Installed page ──────────────────────────────────────────────

/// A group of one-shot reveal elements sharing one observer.
pub struct RevealGroup {
    tracker: Rc<RefCell<RevealTracker<Element>>>,
    _observer: Observer,
}

impl RevealGroup {
    /// Elements that have not been revealed yet.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.tracker.borrow().len()
    }
}

/// The dark-mode controller bound to its section.
pub struct TransitionBinding {
    _subscription: Observer,
    controller: SectionTransition<BrowserScheduler, ClassPair>,
}

impl TransitionBinding {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }
}

impl Drop for TransitionBinding {
    fn drop(&mut self) {
        // Cancels a pending timer and clears the class on both targets.
        self.controller.on_visibility(false);
    }
}

/// Every live behaviour on the page.
pub struct LandingPage {
    navbar: Option<Listener>,
    anchors: Vec<Listener>,
    hero: Option<RevealGroup>,
    transition: Option<TransitionBinding>,
    sections: Option<RevealGroup>,
}

impl LandingPage {
    /// Wire all five behaviours. Never fails as a whole.
    pub fn install(window: &Window, document: &Document, config: &FxConfig) -> Self {
        Self {
            navbar: settle("navbar", install_navbar(window, document, &config.navbar).map(Some)),
            anchors: settle("anchors", install_anchors(window, document, &config.anchors, &config.navbar))
                .unwrap_or_default(),
            hero: settle("hero", install_reveal(document, &config.hero)),
            transition: settle("transition", install_transition(document, &config.transition)),
            sections: settle("sections", install_reveal(document, &config.sections)),
        }
    }

    /// Names of the behaviours that are wired, for logging.
    #[must_use]
    pub fn active_behaviours(&self) -> Vec<&'static str> {
        [
            ("navbar", self.navbar.is_some()),
            ("anchors", !self.anchors.is_empty()),
            ("hero", self.hero.is_some()),
            ("transition", self.transition.is_some()),
            ("sections", self.sections.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, active)| active.then_some(name))
        .collect()
    }

    #[must_use]
    pub fn transition_phase(&self) -> Option<Phase> {
        self.transition.as_ref().map(TransitionBinding::phase)
    }

    /// Reveal elements still waiting across both reveal groups.
    #[must_use]
    pub fn unrevealed(&self) -> usize {
        [&self.hero, &self.sections].into_iter().flatten().map(RevealGroup::waiting).sum()
    }
}

/// Collapse an installer result: absent elements and failures both skip the
/// behaviour, but only failures are worth a warning.
fn settle<T>(behaviour: &'static str, result: Result<Option<T>, DomError>) -> Option<T> {
    match result {
        Ok(Some(installed)) => Some(installed),
        Ok(None) => {
            log::debug!("{behaviour}: no matching elements, skipped");
            None
        }
        Err(err) => {
            log::warn!("{behaviour}: {err}");
            None
        }
    }
}

// ── Behaviours ──────────────────────────────────────────────────

/// The navbar is looked up on every scroll event, so the listener is wired
/// even when the navbar is not in the document yet.
fn install_navbar(window: &Window, document: &Document, config: &NavbarConfig) -> Result<Listener, DomError> {
    let shrink = NavbarShrink::new(config.scroll_threshold);
    let scroll_window = window.clone();
    let document = document.clone();
    let navbar_id = config.element_id.clone();
    let class = config.scrolled_class.clone();

    Listener::add(window, "scroll", true, move |_: Event| {
        let Some(navbar) = document.get_element_by_id(&navbar_id) else {
            return;
        };
        match scroll_window.scroll_y() {
            Ok(scroll_y) => dom::set_class(&navbar, &class, shrink.is_scrolled(scroll_y)),
            Err(err) => log::warn!("scrollY unavailable: {}", dom::describe(&err)),
        }
    })
}

fn install_anchors(
    window: &Window,
    document: &Document,
    config: &AnchorConfig,
    navbar: &NavbarConfig,
) -> Result<Option<Vec<Listener>>, DomError> {
    let anchors = dom::query_all(document, &config.selector)?;
    if anchors.is_empty() {
        return Ok(None);
    }

    let policy = AnchorScroll::new(config.fallback_navbar_height, config.gap);
    let listeners = anchors
        .into_iter()
        .map(|anchor| {
            let window = window.clone();
            let document = document.clone();
            let navbar_id = navbar.element_id.clone();
            let link = anchor.clone();
            Listener::add(&anchor, "click", false, move |event: Event| {
                event.prevent_default();
                let href = link.get_attribute("href").unwrap_or_default();
                let command = policy.resolve(&href, |selector| {
                    dom::locate_anchor_target(&window, &document, selector, &navbar_id)
                });
                if let Some(command) = command {
                    dom::scroll_to(&window, command);
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(listeners))
}

fn install_reveal(document: &Document, config: &RevealConfig) -> Result<Option<RevealGroup>, DomError> {
    let elements = dom::query_all(document, &config.selector_group())?;
    if elements.is_empty() {
        return Ok(None);
    }

    let tracker: Rc<RefCell<RevealTracker<Element>>> = Rc::new(RefCell::new(elements.iter().cloned().collect()));
    let class = config.class.clone();
    let tracker_for_callback = Rc::clone(&tracker);
    let observer = Observer::new(&config.observer, move |entries, observer| {
        let revealed = tracker_for_callback
            .borrow_mut()
            .on_entries(entries.iter().map(|entry| (entry.target(), entry.is_intersecting())));
        for element in revealed {
            dom::set_class(&element, &class, true);
            observer.unobserve(&element);
        }
    })?;
    for element in &elements {
        observer.observe(element);
    }
    Ok(Some(RevealGroup { tracker, _observer: observer }))
}

fn install_transition(document: &Document, config: &TransitionConfig) -> Result<Option<TransitionBinding>, DomError> {
    let Some(section) = dom::query_one(document, &config.section_selector)? else {
        return Ok(None);
    };
    let body = dom::body(document)?;

    let controller = SectionTransition::new(
        BrowserScheduler,
        ClassPair::new(body, section.clone(), config.class.as_str()),
        config.delay_ms,
    );
    let subscription = controller.watch(&IntersectionSource::new(section, config.observer))?;
    Ok(Some(TransitionBinding { _subscription: subscription, controller }))
}
