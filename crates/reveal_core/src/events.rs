//! Visibility and host input events

use serde::{Deserialize, Serialize};

use crate::geometry::ScrollDirection;
use crate::scene::NodeId;

/// Which viewport boundary a region crossed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// The region moved into the active zone
    Enter,
    /// The region moved out of the active zone
    Leave,
}

/// A boundary crossing reported by a visibility tracker
///
/// Fired on every crossing in either scroll direction, not just the first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEvent {
    /// Tracked region (section root, ambient layer or counter node)
    pub region: NodeId,
    pub boundary: Boundary,
    pub direction: ScrollDirection,
}

impl VisibilityEvent {
    pub fn enter(region: NodeId, direction: ScrollDirection) -> Self {
        Self {
            region,
            boundary: Boundary::Enter,
            direction,
        }
    }

    pub fn leave(region: NodeId, direction: ScrollDirection) -> Self {
        Self {
            region,
            boundary: Boundary::Leave,
            direction,
        }
    }

    pub fn is_enter(&self) -> bool {
        self.boundary == Boundary::Enter
    }
}

/// Input the host forwards to the engine between frames
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Document scroll offset changed
    Scroll { y: f32 },
    /// Viewport dimensions changed
    Resize { width: f32, height: f32 },
    /// A node was removed from the document
    Detach { id: NodeId },
    /// The root container is going away
    Unmount,
}
