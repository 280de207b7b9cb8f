//! Reveal Headless Runtime
//!
//! Drives a [`ScrollEngine`](reveal_scroll::ScrollEngine) through a scripted
//! JSON scenario without a browser or window: scroll, wait, resize, detach,
//! and assert on group playback state, element styles and counter text.
//!
//! ```rust
//! use reveal_app::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "scene": {
//!         "id": 0,
//!         "children": [{
//!             "id": 1,
//!             "role": { "kind": "section", "name": "hero" },
//!             "bounds": { "x": 0, "y": 0, "width": 1280, "height": 720 },
//!             "children": [{ "id": 2, "role": { "kind": "heading" } }]
//!         }]
//!     },
//!     "steps": [
//!         { "type": "tick", "frames": 1 },
//!         { "type": "assert_group_state", "section": "hero", "kind": "heading", "state": "playing" }
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod plan;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod scenario;

pub use assert::{AssertionResult, DiagnosticsSnapshot, GroupSnapshot};
pub use plan::{plan_scenario, ScenePlan};
pub use report::{HeadlessReport, ReportStatus, RunTotals};
pub use runner::{
    run_loaded_scenario, run_loaded_scenario_with_observer, run_scenario, ProbeContext,
    RunOutcome,
};
pub use runtime::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
pub use scenario::{HeadlessScenario, ScenarioStep};
