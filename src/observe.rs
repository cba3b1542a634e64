//! Intersection observer options and CSS root margins.
//!
//! `IntersectionObserver` takes its root margin as a CSS shorthand string
//! (`"0px 0px -100px 0px"`). [`RootMargin`] parses that string up front so a
//! malformed margin is reported at configuration time instead of as a thrown
//! `SyntaxError` when the observer is constructed.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors produced while parsing a root margin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarginError {
    #[error("root margin is empty")]
    Empty,
    #[error("root margin has {0} values, expected 1 to 4")]
    TooManyValues(usize),
    #[error("invalid root margin length: {0:?} (expected px or %)")]
    InvalidLength(String),
}

/// A single margin length. The platform only accepts pixels and percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    #[must_use]
    pub fn zero() -> Self {
        Self::Px(0.0)
    }
}

impl FromStr for Length {
    type Err = MarginError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginError::InvalidLength(raw.to_owned());
        if raw == "0" {
            return Ok(Self::zero());
        }
        if let Some(number) = raw.strip_suffix("px") {
            return number.parse::<f64>().map(Self::Px).map_err(|_| invalid());
        }
        if let Some(number) = raw.strip_suffix('%') {
            return number.parse::<f64>().map(Self::Percent).map_err(|_| invalid());
        }
        Err(invalid())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Margin applied to the viewport before intersections are computed.
///
/// Negative values shrink the effective trigger zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(Length::zero())
    }
}

impl RootMargin {
    #[must_use]
    pub fn uniform(length: Length) -> Self {
        Self { top: length, right: length, bottom: length, left: length }
    }
}

impl FromStr for RootMargin {
    type Err = MarginError;

    /// Parse CSS margin shorthand with the usual 1-4 value expansion.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let values = raw
            .split_whitespace()
            .map(str::parse::<Length>)
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [] => Err(MarginError::Empty),
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self { top: *top, right: *right, bottom: *bottom, left: *left }),
            more => Err(MarginError::TooManyValues(more.len())),
        }
    }
}

impl TryFrom<String> for RootMargin {
    type Error = MarginError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    /// Always emits the four-value form, which every browser accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Options for one intersection observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible, in `[0, 1]`.
    pub threshold: f64,
    #[serde(default)]
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    #[must_use]
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        Self { threshold, root_margin }
    }

    /// Whether the threshold is a finite fraction the platform will accept.
    #[must_use]
    pub fn threshold_is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.threshold)
    }
}
