//! Reveal Scroll Engine
//!
//! Replays staggered entry animations every time a section scrolls into view.
//!
//! # Features
//!
//! - **Visibility Tracking**: repeatable enter/leave crossings with hysteresis
//! - **Section Scanning**: role-tagged scene nodes classified into groups
//! - **Playback Control**: one state machine shared by groups, layers and counters
//! - **Parallax**: ambient layers with center triggers and scroll drift
//! - **Counters**: numeric count-ups that reset on leave
//! - **Disposal**: every timeline released on unmount
//!
//! The host seam is two traits: [`LayoutProbe`] for reading layout and
//! [`StyleSink`] for receiving computed styles.

pub mod config;
pub mod counter;
pub mod disposal;
pub mod engine;
pub mod group;
pub mod host;
pub mod input;
pub mod parallax;
pub mod playback;
pub mod scanner;
pub mod visibility;

pub use config::{CounterConfig, EngineConfig};
pub use counter::{Counter, CounterInput, CounterValue};
pub use disposal::DisposalManager;
pub use engine::{EngineMode, FrameReport, ScrollEngine, SectionRuntime};
pub use group::GroupPlayback;
pub use host::{LayoutProbe, StaticLayout, StyleLog, StyleSink};
pub use input::{Debouncer, FrameCoalescer};
pub use parallax::{ParallaxCoordinator, ParallaxLayer};
pub use playback::{Playable, PlaybackController, PlaybackEffect, PlaybackState};
pub use scanner::{AmbientLayer, CounterNode, ScanResult, ScannedGroup, ScannedSection, SectionScanner};
pub use visibility::{
    Anchor, Observation, TriggerLine, TriggerZone, VisibilityThresholds, VisibilityTracker,
};
