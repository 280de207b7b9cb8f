//! Scenario definition for headless scroll runs.

use anyhow::{Context, Result};
use reveal_core::{GroupKind, NodeId, SceneNode, Viewport};
use reveal_scroll::{EngineConfig, EngineMode, PlaybackState};
use serde::Deserialize;
use std::path::Path;

fn default_tolerance() -> f32 {
    0.5
}

/// A scene plus the scripted interaction to run against it.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    /// Root of the page's scene graph (bounds taken from each node).
    pub scene: SceneNode,
    /// Initial viewport; defaults to the run config's dimensions at scroll 0.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    /// Simulate a host that cannot observe layout.
    #[serde(default)]
    pub pass_through: bool,
    /// Engine settings embedded in the scenario; overrides the caller's.
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Whether any step needs an engine snapshot.
    pub fn has_assertions(&self) -> bool {
        self.steps.iter().any(ScenarioStep::is_assertion)
    }
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Scroll the document and run one frame so the engine observes it.
    ScrollTo { y: f32 },
    /// Advance logical time, one tick-sized frame at a time.
    Wait { ms: u64 },
    /// Run a fixed number of frames.
    Tick { frames: u32 },
    /// Change the viewport size; applied once the resize debounce settles.
    Resize { width: f32, height: f32 },
    /// Remove a node (and its subtree) from the document.
    Detach { id: NodeId },
    /// Replace a counter's authored value.
    SetCounter { id: NodeId, value: String },
    /// Tear the engine down.
    Unmount,
    AssertGroupState {
        section: String,
        kind: GroupKind,
        state: PlaybackState,
    },
    /// Play head of a group's timeline; `ms: null` expects a disposed timeline.
    AssertPosition {
        section: String,
        kind: GroupKind,
        ms: Option<f32>,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertOpacity {
        id: NodeId,
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertCounter { id: NodeId, text: String },
    AssertMode { mode: EngineMode },
    AssertLiveTimelines { count: usize },
}

impl ScenarioStep {
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            ScenarioStep::AssertGroupState { .. }
                | ScenarioStep::AssertPosition { .. }
                | ScenarioStep::AssertOpacity { .. }
                | ScenarioStep::AssertCounter { .. }
                | ScenarioStep::AssertMode { .. }
                | ScenarioStep::AssertLiveTimelines { .. }
        )
    }

    /// Name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::ScrollTo { .. } => "scroll_to",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::Detach { .. } => "detach",
            ScenarioStep::SetCounter { .. } => "set_counter",
            ScenarioStep::Unmount => "unmount",
            ScenarioStep::AssertGroupState { .. } => "assert_group_state",
            ScenarioStep::AssertPosition { .. } => "assert_position",
            ScenarioStep::AssertOpacity { .. } => "assert_opacity",
            ScenarioStep::AssertCounter { .. } => "assert_counter",
            ScenarioStep::AssertMode { .. } => "assert_mode",
            ScenarioStep::AssertLiveTimelines { .. } => "assert_live_timelines",
        }
    }
}
