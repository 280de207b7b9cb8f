//! Scenario runner that drives a scroll engine through headless steps.

use crate::assert::{
    evaluate_counter, evaluate_group_state, evaluate_live_timelines, evaluate_mode,
    evaluate_opacity, evaluate_position, AssertionResult, DiagnosticsSnapshot,
};
use crate::report::{HeadlessReport, RunTotals};
use crate::runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::scenario::{HeadlessScenario, ScenarioStep};
use anyhow::{Context, Result};
use reveal_core::{HostEvent, Scene, Viewport};
use reveal_scroll::{EngineConfig, ScrollEngine, StaticLayout, StyleLog};
use tracing::{debug, info};

/// Temporal context passed into observers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeContext {
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub step_index: usize,
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON with default runtime and engine settings.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, HeadlessRunConfig::default(), EngineConfig::default())
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    engine_cfg: EngineConfig,
) -> Result<RunOutcome> {
    let mut observer = |_: &ProbeContext, _: &DiagnosticsSnapshot| {};
    run_loaded_scenario_with_observer(scenario, runtime_cfg, engine_cfg, &mut observer)
}

/// Execute a pre-loaded scenario, sampling snapshots into `observer`
/// every `probe_every_frames` frames.
pub fn run_loaded_scenario_with_observer<F>(
    scenario: &HeadlessScenario,
    runtime_cfg: HeadlessRunConfig,
    engine_cfg: EngineConfig,
    observer: &mut F,
) -> Result<RunOutcome>
where
    F: FnMut(&ProbeContext, &DiagnosticsSnapshot),
{
    runtime_cfg.validate()?;
    let mut session = Session::mount(scenario, runtime_cfg, engine_cfg)?;
    let probe_every = runtime_cfg.probe_every_frames.max(1);

    for (step_index, step) in scenario.steps.iter().enumerate() {
        debug!(step_index, step = step.name(), "running step");
        let result = match step {
            ScenarioStep::ScrollTo { y } => {
                session.engine.on_scroll(*y);
                session.layout.scroll_to(*y);
                session.run_frames(1, probe_every, step_index, observer, |tick| tick)?;
                AssertionResult::Passed
            }
            ScenarioStep::Wait { ms } => {
                let frames = wait_frames(*ms, runtime_cfg.tick_ms);
                let mut remaining_ms = *ms;
                session.run_frames(frames, probe_every, step_index, observer, |tick| {
                    let step_ms = remaining_ms.min(tick);
                    remaining_ms = remaining_ms.saturating_sub(step_ms);
                    step_ms
                })?;
                AssertionResult::Passed
            }
            ScenarioStep::Tick { frames } => {
                session.run_frames(*frames, probe_every, step_index, observer, |tick| tick)?;
                AssertionResult::Passed
            }
            ScenarioStep::Resize { width, height } => {
                session.engine.on_resize(*width, *height);
                session.layout.resize(*width, *height);
                AssertionResult::Passed
            }
            ScenarioStep::Detach { id } => {
                session.engine.handle(HostEvent::Detach { id: *id });
                session.layout.remove(*id);
                AssertionResult::Passed
            }
            ScenarioStep::SetCounter { id, value } => {
                if session.engine.set_counter_value(*id, value) {
                    AssertionResult::Passed
                } else {
                    AssertionResult::Failed {
                        code: "missing_counter".to_string(),
                        message: format!("{id}: not a counter"),
                    }
                }
            }
            ScenarioStep::Unmount => {
                session.engine.handle(HostEvent::Unmount);
                AssertionResult::Passed
            }
            ScenarioStep::AssertGroupState {
                section,
                kind,
                state,
            } => evaluate_group_state(section, *kind, *state, &session.snapshot()),
            ScenarioStep::AssertPosition {
                section,
                kind,
                ms,
                tolerance,
            } => evaluate_position(section, *kind, *ms, *tolerance, &session.snapshot()),
            ScenarioStep::AssertOpacity {
                id,
                value,
                tolerance,
            } => evaluate_opacity(*id, *value, *tolerance, &session.snapshot()),
            ScenarioStep::AssertCounter { id, text } => {
                evaluate_counter(*id, text, &session.snapshot())
            }
            ScenarioStep::AssertMode { mode } => evaluate_mode(*mode, &session.snapshot()),
            ScenarioStep::AssertLiveTimelines { count } => {
                evaluate_live_timelines(*count, &session.snapshot())
            }
        };

        if let AssertionResult::Failed { code, message } = result {
            let report =
                HeadlessReport::failed(session.totals, step_index, step.name(), code, message);
            info!(step_index, assertion = step.name(), "scenario failed");
            return Ok(RunOutcome::Failed { report });
        }
    }

    info!(
        frames = session.totals.elapsed_frames,
        crossings = session.totals.crossings,
        "scenario passed"
    );
    Ok(RunOutcome::Passed {
        report: HeadlessReport::passed(session.totals),
    })
}

/// Engine plus the in-memory host it runs against.
struct Session {
    engine: ScrollEngine,
    layout: StaticLayout,
    styles: StyleLog,
    runtime_cfg: HeadlessRunConfig,
    totals: RunTotals,
}

impl Session {
    fn mount(
        scenario: &HeadlessScenario,
        runtime_cfg: HeadlessRunConfig,
        engine_cfg: EngineConfig,
    ) -> Result<Self> {
        let scene = Scene::new(scenario.scene.clone());
        let viewport = scenario.viewport.unwrap_or_else(|| {
            Viewport::new(0.0, runtime_cfg.width as f32, runtime_cfg.height as f32)
        });
        let probe_viewport = (!scenario.pass_through).then_some(viewport);
        let layout = StaticLayout::from_scene(&scene, probe_viewport);
        let engine_cfg = scenario.engine.clone().unwrap_or(engine_cfg);
        let engine =
            ScrollEngine::mount(&scene, &layout, engine_cfg).context("failed to mount scene")?;

        Ok(Self {
            engine,
            layout,
            styles: StyleLog::new(),
            runtime_cfg,
            totals: RunTotals::default(),
        })
    }

    fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot::capture(&self.engine, &self.styles)
    }

    fn run_frames<F, A>(
        &mut self,
        frames: u32,
        probe_every: u32,
        step_index: usize,
        observer: &mut F,
        mut advance_ms: A,
    ) -> Result<()>
    where
        F: FnMut(&ProbeContext, &DiagnosticsSnapshot),
        A: FnMut(u64) -> u64,
    {
        if frames == 0 {
            return Ok(());
        }

        let mut cfg = self.runtime_cfg;
        cfg.max_frames = frames;
        let tick_ms = cfg.tick_ms;
        let mut sampled_frames = 0u32;
        HeadlessRuntime::run(cfg, |_| {
            let dt_ms = advance_ms(tick_ms);
            let report = self
                .engine
                .frame(dt_ms as f32, &self.layout, &mut self.styles);
            let totals = &mut self.totals;
            totals.crossings = totals.crossings.saturating_add(report.events.len() as u64);
            totals.elapsed_frames = totals.elapsed_frames.saturating_add(1);
            totals.elapsed_ms = totals.elapsed_ms.saturating_add(dt_ms);
            sampled_frames = sampled_frames.saturating_add(1);

            if sampled_frames % probe_every == 0 || sampled_frames == frames {
                let ctx = ProbeContext {
                    elapsed_frames: self.totals.elapsed_frames,
                    elapsed_ms: self.totals.elapsed_ms,
                    step_index,
                };
                observer(&ctx, &self.snapshot());
            }
            Ok(())
        })
    }
}

fn wait_frames(wait_ms: u64, tick_ms: u64) -> u32 {
    if wait_ms == 0 {
        return 0;
    }
    let tick = tick_ms.max(1);
    let frames = wait_ms.saturating_add(tick.saturating_sub(1)) / tick;
    frames.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_frames_rounds_up() {
        assert_eq!(wait_frames(0, 16), 0);
        assert_eq!(wait_frames(16, 16), 1);
        assert_eq!(wait_frames(17, 16), 2);
        assert_eq!(wait_frames(250, 16), 16);
    }

    #[test]
    fn test_observer_sampling() {
        let scenario = HeadlessScenario::from_json(
            r#"{ "scene": { "id": 0 }, "steps": [{ "type": "tick", "frames": 10 }] }"#,
        )
        .unwrap();
        let mut samples = Vec::new();
        let mut observer = |ctx: &ProbeContext, _: &DiagnosticsSnapshot| {
            samples.push(ctx.elapsed_frames);
        };
        let outcome = run_loaded_scenario_with_observer(
            &scenario,
            HeadlessRunConfig::default(),
            EngineConfig::default(),
            &mut observer,
        )
        .unwrap();
        assert!(!outcome.is_failed());
        assert_eq!(samples, vec![4, 8, 10]);
        assert_eq!(outcome.report().totals.elapsed_ms, 160);
    }

    #[test]
    fn test_wait_uses_partial_last_frame() {
        let outcome = run_scenario(
            r#"{ "scene": { "id": 0 }, "steps": [{ "type": "wait", "ms": 40 }] }"#,
        )
        .unwrap();
        assert_eq!(outcome.report().totals.elapsed_frames, 3);
        assert_eq!(outcome.report().totals.elapsed_ms, 40);
    }

    #[test]
    fn test_unknown_counter_fails_step() {
        let outcome = run_scenario(
            r#"{ "scene": { "id": 0 }, "steps": [{ "type": "set_counter", "id": 4, "value": "9" }] }"#,
        )
        .unwrap();
        assert!(outcome.is_failed());
        assert_eq!(outcome.report().code.as_deref(), Some("missing_counter"));
    }
}
