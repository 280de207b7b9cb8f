//! Document-space geometry
//!
//! All rectangles are in document coordinates (y grows downward, origin at
//! the top of the scrollable document). The viewport is the visible window
//! into that document.

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in document space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top edge (document y)
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (document y)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the vertical span of this rect overlaps the open span `(top, bottom)`
    pub fn overlaps_span(&self, top: f32, bottom: f32) -> bool {
        self.top() < bottom && self.bottom() > top
    }
}

/// The visible window into the document
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Document scroll offset of the viewport's top edge
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(scroll_y: f32, width: f32, height: f32) -> Self {
        Self {
            scroll_y,
            width,
            height,
        }
    }

    /// Document y of the viewport's top edge
    pub fn top(&self) -> f32 {
        self.scroll_y
    }

    /// Document y of the viewport's bottom edge
    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }

    /// Document y of the viewport's vertical center
    pub fn center(&self) -> f32 {
        self.scroll_y + self.height * 0.5
    }

    /// Same viewport scrolled to `scroll_y`
    pub fn scrolled_to(self, scroll_y: f32) -> Self {
        Self { scroll_y, ..self }
    }

    /// Same scroll offset with new dimensions
    pub fn resized(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 1280.0, 720.0)
    }
}

/// Direction of the most recent scroll movement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Scrolling down the document (scroll offset increasing)
    Forward,
    /// Scrolling back up (scroll offset decreasing)
    Backward,
    /// No movement since the last observation
    #[default]
    None,
}

impl ScrollDirection {
    /// Direction of travel from `previous` to `current` scroll offset
    pub fn between(previous: f32, current: f32) -> Self {
        if current > previous {
            ScrollDirection::Forward
        } else if current < previous {
            ScrollDirection::Backward
        } else {
            ScrollDirection::None
        }
    }
}
