//! Assertion helpers for headless scroll scenarios.

use std::collections::HashMap;

use reveal_animation::VisualProps;
use reveal_core::{GroupKind, NodeId};
use reveal_scroll::{EngineMode, PlaybackState, ScrollEngine, StyleLog};
use serde::Serialize;

/// Snapshot of engine-observable state used for headless assertions.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSnapshot {
    pub mode: EngineMode,
    pub scroll_y: f32,
    /// Keyed by `(section name, group kind)`.
    #[serde(skip)]
    pub groups: HashMap<(String, GroupKind), GroupSnapshot>,
    #[serde(skip)]
    pub styles: HashMap<NodeId, VisualProps>,
    #[serde(skip)]
    pub texts: HashMap<NodeId, String>,
    pub live_timelines: usize,
}

/// Playback state of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSnapshot {
    pub state: PlaybackState,
    /// `None` once the group's timeline has been disposed.
    pub position_ms: Option<f32>,
}

impl DiagnosticsSnapshot {
    /// Capture the engine and the styles written so far.
    pub fn capture(engine: &ScrollEngine, styles: &StyleLog) -> Self {
        let groups = engine
            .sections()
            .iter()
            .flat_map(|section| {
                section.groups().iter().map(move |group| {
                    (
                        (section.name().to_string(), group.kind()),
                        GroupSnapshot {
                            state: group.state(),
                            position_ms: group.position_ms(engine.scheduler()),
                        },
                    )
                })
            })
            .collect();

        Self {
            mode: engine.mode(),
            scroll_y: engine.viewport().scroll_y,
            groups,
            styles: styles.styles().map(|(id, props)| (id, *props)).collect(),
            texts: styles
                .texts()
                .map(|(id, text)| (id, text.to_string()))
                .collect(),
            live_timelines: engine.live_timelines(),
        }
    }

    fn group(&self, section: &str, kind: GroupKind) -> Result<&GroupSnapshot, AssertionResult> {
        self.groups
            .get(&(section.to_string(), kind))
            .ok_or_else(|| AssertionResult::Failed {
                code: "missing_group".to_string(),
                message: format!("{section}/{kind}: group not found"),
            })
    }
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_group_state(
    section: &str,
    kind: GroupKind,
    expected: PlaybackState,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let group = match snapshot.group(section, kind) {
        Ok(group) => group,
        Err(failure) => return failure,
    };
    if group.state == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "state_mismatch",
            format!(
                "{section}/{kind}: expected {expected:?}, got {:?}",
                group.state
            ),
        )
    }
}

pub fn evaluate_position(
    section: &str,
    kind: GroupKind,
    expected: Option<f32>,
    tolerance: f32,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let group = match snapshot.group(section, kind) {
        Ok(group) => group,
        Err(failure) => return failure,
    };
    let matches = match (group.position_ms, expected) {
        (Some(actual), Some(expected)) => (actual - expected).abs() <= tolerance,
        (None, None) => true,
        _ => false,
    };
    if matches {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "position_mismatch",
            format!(
                "{section}/{kind}: expected position {expected:?}, got {:?}",
                group.position_ms
            ),
        )
    }
}

pub fn evaluate_opacity(
    id: NodeId,
    expected: f32,
    tolerance: f32,
    snapshot: &DiagnosticsSnapshot,
) -> AssertionResult {
    let Some(style) = snapshot.styles.get(&id) else {
        return AssertionResult::failed("missing_style", format!("{id}: no style written"));
    };
    if (style.opacity - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "opacity_mismatch",
            format!("{id}: expected opacity {expected}, got {}", style.opacity),
        )
    }
}

pub fn evaluate_counter(id: NodeId, expected: &str, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    let Some(text) = snapshot.texts.get(&id) else {
        return AssertionResult::failed("missing_text", format!("{id}: no counter text written"));
    };
    if text == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "text_mismatch",
            format!("{id}: expected '{expected}', got '{text}'"),
        )
    }
}

pub fn evaluate_mode(expected: EngineMode, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.mode == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "mode_mismatch",
            format!("expected engine mode {expected:?}, got {:?}", snapshot.mode),
        )
    }
}

pub fn evaluate_live_timelines(expected: usize, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.live_timelines == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "timeline_count_mismatch",
            format!(
                "expected {expected} live timelines, got {}",
                snapshot.live_timelines
            ),
        )
    }
}
