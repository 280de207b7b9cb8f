//! Engine configuration
//!
//! Every field has a default, so an empty table is a valid configuration:
//!
//! ```toml
//! resize_debounce_ms = 150
//!
//! [counter]
//! duration_ms = 2000
//! easing = "power3.out"
//!
//! [motion.heading]
//! duration_ms = 900
//! easing = "back.out"
//! ```

use std::collections::BTreeMap;

use reveal_animation::{AnimationGroupFactory, Easing, ProfileOverride};
use reveal_core::{GroupKind, Result, RevealError, Viewport};
use serde::{Deserialize, Serialize};

use crate::visibility::VisibilityThresholds;

fn default_resize_debounce_ms() -> u32 {
    150
}

fn default_counter_duration_ms() -> u32 {
    2000
}

fn default_counter_easing() -> Easing {
    Easing::EaseOutCubic
}

fn default_parallax_thresholds() -> VisibilityThresholds {
    VisibilityThresholds::center()
}

/// Counter tween settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_duration_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_counter_easing")]
    pub easing: Easing,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration_ms(),
            easing: default_counter_easing(),
        }
    }
}

/// Configuration of one [`ScrollEngine`](crate::ScrollEngine) mount
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Zones for sections and counters
    #[serde(default)]
    pub thresholds: VisibilityThresholds,
    /// Zones for ambient parallax layers
    #[serde(default = "default_parallax_thresholds")]
    pub parallax_thresholds: VisibilityThresholds,
    /// Quiet period before a resize is applied
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u32,
    #[serde(default)]
    pub counter: CounterConfig,
    /// Per-kind patches on top of the motion presets
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub motion: BTreeMap<GroupKind, ProfileOverride>,
}

impl EngineConfig {
    /// Reject configurations that could never trigger or would flicker
    pub fn validate(&self) -> Result<()> {
        let reference = Viewport::default();
        self.thresholds.validate(&reference)?;
        self.parallax_thresholds.validate(&reference)?;

        for (kind, patch) in &self.motion {
            if patch.duration_ms == Some(0) {
                return Err(RevealError::InvalidConfig(format!(
                    "motion.{kind}.duration_ms must be greater than zero"
                )));
            }
            if let Some(stagger) = patch.stagger {
                if stagger.step_ms == 0 {
                    return Err(RevealError::InvalidConfig(format!(
                        "motion.{kind}.stagger.step_ms must be greater than zero"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Factory with every motion override applied
    pub fn factory(&self) -> AnimationGroupFactory {
        self.motion
            .iter()
            .fold(AnimationGroupFactory::new(), |factory, (kind, patch)| {
                factory.with_override(*kind, patch)
            })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: VisibilityThresholds::default(),
            parallax_thresholds: default_parallax_thresholds(),
            resize_debounce_ms: default_resize_debounce_ms(),
            counter: CounterConfig::default(),
            motion: BTreeMap::new(),
        }
    }
}
