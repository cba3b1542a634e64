//! Scroll and intersection effects for the marketing landing page.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! small set of presentation behaviours the page needs: shrinking the navbar
//! once the user scrolls, smooth-scrolling anchor links past the fixed navbar,
//! one-shot reveal animations, and the delayed dark-mode transition around the
//! problem section. Markup and CSS live with the page; this crate only adds and
//! removes class names.
//!
//! Every decision is made by platform-free code that is unit tested natively.
//! The [`dom`] and [`page`] modules are the only ones that touch `web-sys`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`transition`] | Debounced dark-mode controller ([`transition::SectionTransition`]) |
//! | [`schedule`] | Schedule/cancel capability and a virtual-clock scheduler |
//! | [`visibility`] | Subscribe/unsubscribe capability for visibility signals |
//! | [`reveal`] | One-shot reveal tracking for animated elements |
//! | [`anchor`] | Scroll-target math for in-page anchor links |
//! | [`navbar`] | Scroll threshold for the navbar shrink |
//! | [`observe`] | Intersection observer options and CSS root margins |
//! | [`config`] | Serde-backed configuration with validated defaults |
//! | [`consts`] | Default selectors, class names, and thresholds |
//! | [`dom`] | Browser bindings: observers, listeners, timers, class sinks |
//! | [`page`] | Page installer and the `wasm-bindgen` entry points |

pub mod anchor;
pub mod config;
pub mod consts;
pub mod dom;
pub mod navbar;
pub mod observe;
pub mod page;
pub mod reveal;
pub mod schedule;
pub mod transition;
pub mod visibility;
