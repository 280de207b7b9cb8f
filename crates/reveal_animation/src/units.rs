//! Lengths that resolve against the viewport
//!
//! Horizontal entry offsets are expressed in viewport units so that
//! neighbouring sections slide the same relative distance on any screen.

use std::fmt;
use std::str::FromStr;

use reveal_core::{RevealError, Viewport};
use serde::{Deserialize, Serialize};

/// A length in pixels or viewport-relative units
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    Px(f32),
    /// Percent of viewport width
    Vw(f32),
    /// Percent of viewport height
    Vh(f32),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    /// Resolve to pixels for the given viewport
    pub fn to_px(self, viewport: &Viewport) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Vw(v) => v * viewport.width / 100.0,
            Length::Vh(v) => v * viewport.height / 100.0,
        }
    }

    /// Same unit, negated magnitude
    pub fn flipped(self) -> Self {
        self.scaled(-1.0)
    }

    /// Same unit, magnitude multiplied by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            Length::Px(v) => Length::Px(v * factor),
            Length::Vw(v) => Length::Vw(v * factor),
            Length::Vh(v) => Length::Vh(v * factor),
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::ZERO
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Vw(v) => write!(f, "{v}vw"),
            Length::Vh(v) => write!(f, "{v}vh"),
        }
    }
}

impl FromStr for Length {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || RevealError::InvalidLength(s.to_string());
        let (number, ctor): (&str, fn(f32) -> Length) = if let Some(n) = raw.strip_suffix("px") {
            (n, Length::Px)
        } else if let Some(n) = raw.strip_suffix("vw") {
            (n, Length::Vw)
        } else if let Some(n) = raw.strip_suffix("vh") {
            (n, Length::Vh)
        } else {
            (raw, Length::Px)
        };
        let value: f32 = number.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(ctor(value))
    }
}

/// Accepts either a bare number (pixels) or a string such as `"10vw"`
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = RevealError;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Number(px) => Ok(Length::Px(px)),
            LengthRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(length: Length) -> Self {
        match length {
            Length::Px(px) => LengthRepr::Number(px),
            other => LengthRepr::Text(other.to_string()),
        }
    }
}
