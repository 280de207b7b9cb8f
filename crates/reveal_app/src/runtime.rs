//! Headless runtime primitives for deterministic frame execution.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_max_frames() -> u32 {
    1
}

fn default_tick_ms() -> u64 {
    16
}

fn default_probe_every_frames() -> u32 {
    4
}

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadlessRunConfig {
    /// Viewport width when the scenario does not set one.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Viewport height when the scenario does not set one.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Number of frames to execute per runtime call.
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// Logical milliseconds between frames.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Observer sampling interval in frames (1 = every frame, 4 = every 4 frames).
    #[serde(default = "default_probe_every_frames")]
    pub probe_every_frames: u32,
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("headless dimensions must be non-zero");
        }
        if self.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if self.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            max_frames: default_max_frames(),
            tick_ms: default_tick_ms(),
            probe_every_frames: default_probe_every_frames(),
        }
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    pub width: u32,
    pub height: u32,
    pub elapsed_ms: u64,
}

/// Deterministic headless runtime loop.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Run a fixed frame budget in headless mode.
    pub fn run<F>(cfg: HeadlessRunConfig, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&HeadlessContext) -> Result<()>,
    {
        cfg.validate()?;

        for frame in 0..cfg.max_frames {
            let elapsed_ms = cfg.tick_ms.saturating_mul(frame as u64);
            on_frame(&HeadlessContext {
                frame_index: frame,
                width: cfg.width,
                height: cfg.height,
                elapsed_ms,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_frame_budget() {
        let cfg = HeadlessRunConfig {
            max_frames: 3,
            ..Default::default()
        };
        let mut seen = Vec::new();
        HeadlessRuntime::run(cfg, |ctx| {
            seen.push((ctx.frame_index, ctx.elapsed_ms));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![(0, 0), (1, 16), (2, 32)]);
    }

    #[test]
    fn test_rejects_zero_values() {
        let zero_tick = HeadlessRunConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(HeadlessRuntime::run(zero_tick, |_| Ok(())).is_err());

        let zero_size = HeadlessRunConfig {
            width: 0,
            ..Default::default()
        };
        assert!(zero_size.validate().is_err());
    }

    #[test]
    fn test_partial_toml_like_input_uses_defaults() {
        let cfg: HeadlessRunConfig = serde_json::from_str(r#"{ "tick_ms": 8 }"#).unwrap();
        assert_eq!(cfg.tick_ms, 8);
        assert_eq!(cfg.width, 1280);
        assert_eq!(cfg.probe_every_frames, 4);
    }
}
