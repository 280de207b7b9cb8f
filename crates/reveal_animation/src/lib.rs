//! Reveal Animation System
//!
//! Staggered group timelines and their building blocks.
//!
//! # Features
//!
//! - **Easing**: named, pluggable curves (`"power3.out"`, `cubic-bezier(..)`)
//! - **Viewport Units**: offsets in `px`, `vw` or `vh`
//! - **Timelines**: one play head per group, one track per element
//! - **Presets**: a motion profile per group kind, patchable from config
//! - **Scheduler**: slotmap-backed handles for every live timeline

pub mod easing;
pub mod factory;
pub mod presets;
pub mod props;
pub mod scheduler;
pub mod stagger;
pub mod timeline;
pub mod units;

pub use easing::Easing;
pub use factory::{AnimationDefinition, AnimationGroupFactory, DefinitionSummary};
pub use presets::{MotionProfile, ProfileOverride};
pub use props::{MotionProps, VisualProps};
pub use scheduler::{AnimationScheduler, TimelineId};
pub use stagger::Stagger;
pub use timeline::{Timeline, Track, TrackId};
pub use units::Length;
