//! Browser bindings.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything that touches `web-sys` lives here: RAII wrappers for event
//! listeners and intersection observers, the `gloo-timers` scheduler, the
//! class-toggling mode sink, and the geometry reads anchor scrolling needs.
//! The decision logic these feed lives in platform-free modules.
//!
//! ERROR HANDLING
//! ==============
//! Failing web-sys calls become [`DomError`]s for installers to log and skip.
//! Failures inside event callbacks have nowhere to propagate to, so they are
//! logged and the callback returns.

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior, ScrollToOptions, Window,
};

use crate::anchor::{ScrollCommand, TargetGeometry};
use crate::observe::ObserverOptions;
use crate::schedule::{Scheduler, Task};
use crate::transition::{Mode, ModeSink};
use crate::visibility::{VisibilityCallback, VisibilitySource};

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("{context} failed: {message}")]
    Js { context: &'static str, message: String },
}

impl DomError {
    #[must_use]
    pub fn js(context: &'static str, value: &JsValue) -> Self {
        Self::Js { context, message: describe(value) }
    }
}

/// Best-effort text for a thrown JS value.
#[must_use]
pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// ── Lookups ─────────────────────────────────────────────────────

/// # Errors
///
/// Returns `Err` outside a browser window context (e.g. in a worker).
pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

/// # Errors
///
/// Returns `Err` if the window has no document.
pub fn document(window: &Window) -> Result<Document, DomError> {
    window.document().ok_or(DomError::NoDocument)
}

/// # Errors
///
/// Returns `Err` if the document has no `<body>` yet.
pub fn body(document: &Document) -> Result<Element, DomError> {
    document.body().map(Element::from).ok_or(DomError::NoBody)
}

/// First element matching `selector`.
///
/// # Errors
///
/// Returns `Err` if `selector` is not valid CSS.
pub fn query_one(document: &Document, selector: &str) -> Result<Option<Element>, DomError> {
    document
        .query_selector(selector)
        .map_err(|e| DomError::js("querySelector", &e))
}

/// Every element matching `selector`, in document order.
///
/// # Errors
///
/// Returns `Err` if `selector` is not valid CSS.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, DomError> {
    let list = document
        .query_selector_all(selector)
        .map_err(|e| DomError::js("querySelectorAll", &e))?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect())
}

/// Add or remove `class` on `element`.
pub fn set_class(element: &Element, class: &str, present: bool) {
    if let Err(err) = element.class_list().toggle_with_force(class, present) {
        log::warn!("classList.toggle({class}) failed: {}", describe(&err));
    }
}

/// Layout height of an element, preferring `offsetHeight` for HTML elements.
#[must_use]
pub fn rendered_height(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map_or_else(|| element.get_bounding_client_rect().height(), |html| f64::from(html.offset_height()))
}

/// Geometry of the anchor target named by `selector`, or `None` when the
/// selector matches nothing or cannot be evaluated.
#[must_use]
pub fn locate_anchor_target(
    window: &Window,
    document: &Document,
    selector: &str,
    navbar_id: &str,
) -> Option<TargetGeometry> {
    let target = match query_one(document, selector) {
        Ok(found) => found?,
        Err(err) => {
            log::debug!("anchor target {selector:?} skipped: {err}");
            return None;
        }
    };
    let scroll_y = match window.scroll_y() {
        Ok(y) => y,
        Err(err) => {
            log::warn!("scrollY unavailable: {}", describe(&err));
            return None;
        }
    };
    Some(TargetGeometry {
        viewport_top: target.get_bounding_client_rect().top(),
        scroll_y,
        navbar_height: document.get_element_by_id(navbar_id).map(|navbar| rendered_height(&navbar)),
    })
}

pub fn scroll_to(window: &Window, command: ScrollCommand) {
    let options = ScrollToOptions::new();
    options.set_top(command.top);
    options.set_behavior(if command.smooth { ScrollBehavior::Smooth } else { ScrollBehavior::Auto });
    window.scroll_to_with_scroll_to_options(&options);
}

// ── Event listeners ─────────────────────────────────────────────

/// An event listener that is removed when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    /// Register `handler` for `kind` events on `target`.
    ///
    /// Passive listeners cannot call `preventDefault`; use them for scroll.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `addEventListener` throws.
    pub fn add<F>(target: &EventTarget, kind: &'static str, passive: bool, handler: F) -> Result<Self, DomError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| DomError::js("addEventListener", &e))?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("removeEventListener({}) failed: {}", self.kind, describe(&err));
        }
    }
}

// ── Intersection observers ──────────────────────────────────────

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// An `IntersectionObserver` that disconnects when dropped.
pub struct Observer {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Observer {
    /// Create an observer; `handler` receives each batch of entries together
    /// with the observer so it can unobserve targets.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the browser rejects the options (e.g. a malformed root margin).
    pub fn new<F>(options: &ObserverOptions, mut handler: F) -> Result<Self, DomError>
    where
        F: FnMut(&[IntersectionObserverEntry], &IntersectionObserver) + 'static,
    {
        let callback: ObserverCallback = Closure::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
            let entries: Vec<IntersectionObserverEntry> = entries
                .iter()
                .map(JsCast::unchecked_into::<IntersectionObserverEntry>)
                .collect();
            handler(&entries, &observer);
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_string());

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| DomError::js("new IntersectionObserver", &e))?;
        Ok(Self { observer, _callback: callback })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Visibility of a single element, as reported by an `IntersectionObserver`.
pub struct IntersectionSource {
    element: Element,
    options: ObserverOptions,
}

impl IntersectionSource {
    #[must_use]
    pub fn new(element: Element, options: ObserverOptions) -> Self {
        Self { element, options }
    }
}

impl VisibilitySource for IntersectionSource {
    type Subscription = Observer;
    type Error = DomError;

    fn subscribe(&self, mut on_change: VisibilityCallback) -> Result<Observer, DomError> {
        let observer = Observer::new(&self.options, move |entries, _| {
            for entry in entries {
                on_change(entry.is_intersecting());
            }
        })?;
        observer.observe(&self.element);
        Ok(observer)
    }
}

// ── Timers ──────────────────────────────────────────────────────

/// [`Scheduler`] backed by `setTimeout` through `gloo-timers`.
///
/// Dropping a [`Timeout`] clears it, so cancelling is just dropping.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Task) -> Timeout {
        Timeout::new(delay_ms, task)
    }

    fn cancel(&self, handle: Timeout) {
        drop(handle);
    }
}

// ── Mode sink ───────────────────────────────────────────────────

/// Toggles one class on a pair of elements together.
pub struct ClassPair {
    targets: [Element; 2],
    class: String,
}

impl ClassPair {
    #[must_use]
    pub fn new(document_target: Element, region: Element, class: impl Into<String>) -> Self {
        Self { targets: [document_target, region], class: class.into() }
    }
}

impl ModeSink for ClassPair {
    fn apply(&self, mode: Mode) {
        for target in &self.targets {
            set_class(target, &self.class, mode.is_dark());
        }
    }
}
