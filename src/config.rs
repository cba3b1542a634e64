//! Landing page configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page has no environment to read from, so the only override surface is
//! a JSON object handed over by the host page through
//! [`crate::page::install_with_config`]. Every section is optional; anything
//! omitted keeps the value from [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::observe::{ObserverOptions, RootMargin};

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{behaviour}: threshold {value} is outside [0, 1]")]
    Threshold { behaviour: &'static str, value: f64 },
    #[error("{behaviour}: {field} must not be empty")]
    Empty { behaviour: &'static str, field: &'static str },
    #[error("{behaviour}: {field} must be a finite, non-negative number")]
    Distance { behaviour: &'static str, field: &'static str },
}

/// Full set of tunables for the five page behaviours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    pub navbar: NavbarConfig,
    pub anchors: AnchorConfig,
    pub hero: RevealConfig,
    pub transition: TransitionConfig,
    pub sections: RevealConfig,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            navbar: NavbarConfig::default(),
            anchors: AnchorConfig::default(),
            hero: RevealConfig::hero(),
            transition: TransitionConfig::default(),
            sections: RevealConfig::sections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavbarConfig {
    pub element_id: String,
    pub scrolled_class: String,
    pub scroll_threshold: f64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            element_id: consts::NAVBAR_ID.to_owned(),
            scrolled_class: consts::SCROLLED_CLASS.to_owned(),
            scroll_threshold: consts::NAVBAR_SCROLL_THRESHOLD_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorConfig {
    pub selector: String,
    pub fallback_navbar_height: f64,
    pub gap: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            selector: consts::ANCHOR_SELECTOR.to_owned(),
            fallback_navbar_height: consts::FALLBACK_NAVBAR_HEIGHT_PX,
            gap: consts::ANCHOR_GAP_PX,
        }
    }
}

/// A group of elements that gain a class the first time they scroll into view.
///
/// Unlike the other sections, a group given in JSON replaces the default
/// group wholesale, so all three fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub class: String,
    pub observer: ObserverOptions,
}

impl RevealConfig {
    /// Hero badge, title, and call to action.
    #[must_use]
    pub fn hero() -> Self {
        Self {
            selectors: to_owned_all(&consts::HERO_SELECTORS),
            class: consts::REVEAL_CLASS.to_owned(),
            observer: ObserverOptions::new(consts::HERO_THRESHOLD, margin_or_default(consts::HERO_ROOT_MARGIN)),
        }
    }

    /// Animated parts of the "nessuna sorpresa" and AI sections.
    #[must_use]
    pub fn sections() -> Self {
        Self {
            selectors: to_owned_all(&consts::SECTION_SELECTORS),
            class: consts::PLAY_ANIMATION_CLASS.to_owned(),
            observer: ObserverOptions::new(
                consts::SECTION_THRESHOLD,
                margin_or_default(consts::SECTION_ROOT_MARGIN),
            ),
        }
    }

    /// Selector list joined into a single `querySelectorAll` group.
    #[must_use]
    pub fn selector_group(&self) -> String {
        self.selectors.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionConfig {
    pub section_selector: String,
    pub class: String,
    pub delay_ms: u32,
    pub observer: ObserverOptions,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            section_selector: consts::TRANSITION_SECTION_SELECTOR.to_owned(),
            class: consts::DARK_MODE_CLASS.to_owned(),
            delay_ms: consts::TRANSITION_DELAY_MS,
            observer: ObserverOptions::new(
                consts::TRANSITION_THRESHOLD,
                margin_or_default(consts::TRANSITION_ROOT_MARGIN),
            ),
        }
    }
}

impl FxConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the JSON is malformed or any value fails [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the browser would either throw on or silently misuse.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field: an empty name, a negative or non-finite
    /// distance, or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("navbar", "elementId", &self.navbar.element_id)?;
        non_empty("navbar", "scrolledClass", &self.navbar.scrolled_class)?;
        if !self.navbar.scroll_threshold.is_finite() {
            return Err(ConfigError::Distance { behaviour: "navbar", field: "scrollThreshold" });
        }

        non_empty("anchors", "selector", &self.anchors.selector)?;
        non_negative("anchors", "fallbackNavbarHeight", self.anchors.fallback_navbar_height)?;
        non_negative("anchors", "gap", self.anchors.gap)?;

        validate_reveal("hero", &self.hero)?;
        validate_reveal("sections", &self.sections)?;

        non_empty("transition", "sectionSelector", &self.transition.section_selector)?;
        non_empty("transition", "class", &self.transition.class)?;
        threshold("transition", &self.transition.observer)?;
        Ok(())
    }
}

fn validate_reveal(behaviour: &'static str, reveal: &RevealConfig) -> Result<(), ConfigError> {
    if reveal.selectors.iter().all(|s| s.trim().is_empty()) {
        return Err(ConfigError::Empty { behaviour, field: "selectors" });
    }
    non_empty(behaviour, "class", &reveal.class)?;
    threshold(behaviour, &reveal.observer)
}

fn threshold(behaviour: &'static str, options: &ObserverOptions) -> Result<(), ConfigError> {
    if options.threshold_is_valid() {
        Ok(())
    } else {
        Err(ConfigError::Threshold { behaviour, value: options.threshold })
    }
}

fn non_empty(behaviour: &'static str, field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty { behaviour, field })
    } else {
        Ok(())
    }
}

fn non_negative(behaviour: &'static str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Distance { behaviour, field })
    }
}

fn to_owned_all(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn margin_or_default(raw: &str) -> RootMargin {
    raw.parse().unwrap_or_default()
}
