//! Reveal Core
//!
//! Foundational types for the Reveal scroll animation engine:
//!
//! - **Scene Graph**: explicit, host-supplied page structure with role tags
//! - **Geometry**: document rectangles, the viewport, scroll direction
//! - **Events**: repeating enter/leave visibility events and host input
//! - **State Machines**: table-driven machines whose effects are plain data

pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod scene;

pub use error::{Result, RevealError};
pub use events::{Boundary, HostEvent, VisibilityEvent};
pub use fsm::{Fired, StateMachine, StateMachineBuilder, Transition};
pub use geometry::{Point, Rect, ScrollDirection, Size, Viewport};
pub use scene::{GroupKind, NodeId, NodeRole, Scene, SceneNode};
