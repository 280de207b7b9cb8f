//! Animated visual properties
//!
//! [`MotionProps`] describe one end of a tween in configuration terms
//! (lengths may be viewport-relative). [`VisualProps`] are the resolved
//! pixel values written to the host each frame.

use reveal_core::Viewport;
use serde::{Deserialize, Serialize};

use crate::units::Length;

/// One end of a tween, before viewport resolution
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionProps {
    /// Opacity (0.0 to 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Translation X
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<Length>,
    /// Translation Y
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<Length>,
    /// Uniform scale factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl MotionProps {
    /// Create properties with only opacity set
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// The resting state every entry animation ends on
    pub fn settled() -> Self {
        Self {
            opacity: Some(1.0),
            translate_x: Some(Length::ZERO),
            translate_y: Some(Length::ZERO),
            scale: Some(1.0),
        }
    }

    /// Builder: set opacity
    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    /// Builder: set X translation
    pub fn with_translate_x(mut self, x: Length) -> Self {
        self.translate_x = Some(x);
        self
    }

    /// Builder: set Y translation
    pub fn with_translate_y(mut self, y: Length) -> Self {
        self.translate_y = Some(y);
        self
    }

    /// Builder: set uniform scale
    pub fn with_scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    /// Negate horizontal translation, keeping its unit
    pub fn mirrored_x(mut self) -> Self {
        self.translate_x = self.translate_x.map(Length::flipped);
        self
    }

    /// Resolve lengths against a viewport; unset properties take resting values
    pub fn resolve(&self, viewport: &Viewport) -> VisualProps {
        VisualProps {
            opacity: self.opacity.unwrap_or(1.0),
            translate_x: self.translate_x.map_or(0.0, |l| l.to_px(viewport)),
            translate_y: self.translate_y.map_or(0.0, |l| l.to_px(viewport)),
            scale: self.scale.unwrap_or(1.0),
        }
    }
}

/// Resolved visual state of one element
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualProps {
    pub opacity: f32,
    /// Pixels
    pub translate_x: f32,
    /// Pixels
    pub translate_y: f32,
    pub scale: f32,
}

impl VisualProps {
    /// Fully visible, untransformed
    pub const IDENTITY: VisualProps = VisualProps {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Interpolate between two property sets
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp(self.opacity, other.opacity, t),
            translate_x: lerp(self.translate_x, other.translate_x, t),
            translate_y: lerp(self.translate_y, other.translate_y, t),
            scale: lerp(self.scale, other.scale, t),
        }
    }

    /// Shift vertically by `dy` pixels
    pub fn offset_y(mut self, dy: f32) -> Self {
        self.translate_y += dy;
        self
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
