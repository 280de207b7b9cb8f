//! Scroll engine
//!
//! [`ScrollEngine`] owns everything created for one mount: scanned sections
//! with their group timelines, ambient parallax layers, counters, the
//! animation scheduler and the disposal registry.
//!
//! The host forwards input with [`ScrollEngine::handle`] (or the
//! `on_*` shorthands) and calls [`ScrollEngine::frame`] once per display
//! frame. Nothing advances outside `frame`.
//!
//! ```rust
//! use reveal_core::{NodeRole, Rect, Scene, SceneNode, Viewport};
//! use reveal_scroll::{EngineConfig, ScrollEngine, StaticLayout, StyleLog};
//!
//! let scene = Scene::new(
//!     SceneNode::new(0, NodeRole::Container).child(
//!         SceneNode::new(1, NodeRole::section("hero"))
//!             .with_bounds(Rect::new(0.0, 0.0, 1280.0, 720.0))
//!             .child(SceneNode::new(2, NodeRole::heading(1))),
//!     ),
//! );
//! let layout = StaticLayout::from_scene(&scene, Some(Viewport::default()));
//! let mut engine = ScrollEngine::mount(&scene, &layout, EngineConfig::default()).unwrap();
//!
//! let mut styles = StyleLog::new();
//! let report = engine.frame(16.0, &layout, &mut styles);
//! assert_eq!(report.events.len(), 1);
//! engine.unmount();
//! ```

use reveal_animation::{AnimationScheduler, VisualProps};
use reveal_core::{
    Boundary, GroupKind, HostEvent, NodeId, Rect, Result, RevealError, Scene, SceneNode,
    Viewport, VisibilityEvent,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::counter::Counter;
use crate::disposal::DisposalManager;
use crate::group::GroupPlayback;
use crate::host::{LayoutProbe, StyleSink};
use crate::input::{Debouncer, FrameCoalescer};
use crate::parallax::ParallaxCoordinator;
use crate::playback::PlaybackState;
use crate::scanner::{ScanResult, SectionScanner};
use crate::visibility::{Observation, VisibilityTracker};

/// How the engine is currently operating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Normal scroll-driven playback
    Animated,
    /// Layout cannot be observed; final styles are written once
    PassThrough,
    /// Unmounted; every call is a no-op
    TornDown,
}

/// A mounted section and its group playbacks
#[derive(Debug)]
pub struct SectionRuntime {
    root: NodeId,
    name: String,
    index: usize,
    tracker: VisibilityTracker,
    groups: Vec<GroupPlayback>,
}

impl SectionRuntime {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_in_view(&self) -> bool {
        self.tracker.is_active()
    }

    pub fn groups(&self) -> &[GroupPlayback] {
        &self.groups
    }

    pub fn group(&self, kind: GroupKind) -> Option<&GroupPlayback> {
        self.groups.iter().find(|g| g.kind() == kind)
    }
}

#[derive(Debug)]
struct CounterRuntime {
    node: NodeId,
    tracker: VisibilityTracker,
    counter: Counter,
}

/// What happened during one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Boundary crossings observed this frame, in processing order
    pub events: SmallVec<[VisibilityEvent; 4]>,
    /// Viewport the frame was computed against
    pub viewport: Option<Viewport>,
}

/// Scroll-synchronized animation orchestrator for one mounted scene
#[derive(Debug)]
pub struct ScrollEngine {
    config: EngineConfig,
    mode: EngineMode,
    viewport: Viewport,
    sections: Vec<SectionRuntime>,
    parallax: ParallaxCoordinator,
    counters: Vec<CounterRuntime>,
    scheduler: AnimationScheduler,
    disposal: DisposalManager,
    scroll: FrameCoalescer<f32>,
    resize: Debouncer<(f32, f32)>,
    parents: FxHashMap<NodeId, NodeId>,
    detached: FxHashSet<NodeId>,
    pass_through_written: bool,
    unobservable: Option<RevealError>,
    frames: u64,
}

impl ScrollEngine {
    /// Scan `scene`, build every group timeline and start observing
    ///
    /// Fails only on an invalid scene or configuration. A probe without a
    /// viewport puts the engine in [`EngineMode::PassThrough`].
    pub fn mount(scene: &Scene, probe: &dyn LayoutProbe, config: EngineConfig) -> Result<Self> {
        scene.validate()?;
        config.validate()?;

        let scan = SectionScanner::scan(scene);
        let (mode, viewport, unobservable) = match probe.viewport() {
            Some(viewport) => (EngineMode::Animated, viewport, None),
            None => {
                let error = RevealError::ObservationUnsupported(
                    "layout probe has no viewport".to_string(),
                );
                warn!(%error, "writing final styles without animation");
                (EngineMode::PassThrough, Viewport::default(), Some(error))
            }
        };

        let mut engine = Self {
            mode,
            viewport,
            sections: Vec::with_capacity(scan.sections.len()),
            parallax: ParallaxCoordinator::new(config.parallax_thresholds),
            counters: Vec::with_capacity(scan.counters.len()),
            scheduler: AnimationScheduler::new(),
            disposal: DisposalManager::new(),
            scroll: FrameCoalescer::new(),
            resize: Debouncer::new(config.resize_debounce_ms),
            parents: parent_map(&scene.root),
            detached: FxHashSet::default(),
            pass_through_written: false,
            unobservable,
            frames: 0,
            config,
        };
        engine.build(scan);

        info!(
            sections = engine.sections.len(),
            timelines = engine.scheduler.len(),
            counters = engine.counters.len(),
            mode = ?engine.mode,
            "mounted scroll engine"
        );
        Ok(engine)
    }

    fn build(&mut self, scan: ScanResult) {
        let factory = self.config.factory();

        for section in scan.sections {
            let groups = section
                .groups
                .iter()
                .map(|group| {
                    let definition = factory.build(group.kind, &group.elements, section.index);
                    GroupPlayback::new(definition, &mut self.scheduler, &mut self.disposal)
                })
                .collect();
            self.sections.push(SectionRuntime {
                root: section.root,
                tracker: VisibilityTracker::new(section.root, self.config.thresholds),
                name: section.name,
                index: section.index,
                groups,
            });
        }

        for layer in scan.ambient {
            self.parallax
                .add(layer, &factory, &mut self.scheduler, &mut self.disposal);
        }

        for counter in scan.counters {
            self.counters.push(CounterRuntime {
                node: counter.node,
                tracker: VisibilityTracker::new(counter.node, self.config.thresholds),
                counter: Counter::new(
                    &counter.value,
                    self.config.counter.duration_ms,
                    self.config.counter.easing,
                ),
            });
        }
    }

    /// Forward one host event
    pub fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Scroll { y } => self.on_scroll(y),
            HostEvent::Resize { width, height } => self.on_resize(width, height),
            HostEvent::Detach { id } => self.detach(id),
            HostEvent::Unmount => self.unmount(),
        }
    }

    /// Record a scroll offset; applied on the next frame
    pub fn on_scroll(&mut self, y: f32) {
        if self.mode == EngineMode::TornDown {
            return;
        }
        self.scroll.push(y);
    }

    /// Record new viewport dimensions; applied after the quiet period
    pub fn on_resize(&mut self, width: f32, height: f32) {
        if self.mode == EngineMode::TornDown {
            return;
        }
        self.resize.push((width, height));
    }

    /// Mark a node (and its subtree) as removed from the document
    pub fn detach(&mut self, node: NodeId) {
        if self.mode == EngineMode::TornDown {
            return;
        }
        debug!(%node, "node detached");
        self.detached.insert(node);
    }

    fn is_detached(&self, node: NodeId) -> bool {
        is_detached(node, &self.parents, &self.detached)
    }

    fn bounds_of(&self, probe: &dyn LayoutProbe, node: NodeId) -> Option<Rect> {
        if self.is_detached(node) {
            None
        } else {
            probe.bounds(node)
        }
    }

    /// Run one frame: apply input, observe visibility, advance and write styles
    pub fn frame(
        &mut self,
        dt_ms: f32,
        probe: &dyn LayoutProbe,
        sink: &mut dyn StyleSink,
    ) -> FrameReport {
        match self.mode {
            EngineMode::TornDown => return FrameReport::default(),
            EngineMode::PassThrough => {
                if !self.pass_through_written {
                    self.write_final(sink);
                    self.pass_through_written = true;
                }
                return FrameReport::default();
            }
            EngineMode::Animated => {}
        }

        self.frames += 1;
        self.apply_input(dt_ms);

        let viewport = self.viewport;
        let mut events = SmallVec::new();
        self.observe_sections(probe, &viewport, &mut events);

        // Resolved up front: observing borrows the scheduler mutably
        let lookup: SmallVec<[(NodeId, Option<Rect>); 4]> = self
            .parallax
            .layers()
            .iter()
            .map(|l| (l.node(), self.bounds_of(probe, l.node())))
            .collect();
        let layer_bounds = |node: NodeId| {
            lookup
                .iter()
                .find(|(id, _)| *id == node)
                .and_then(|(_, rect)| *rect)
        };
        self.parallax.observe(
            &layer_bounds,
            &viewport,
            &mut self.scheduler,
            &mut self.disposal,
            &mut events,
        );
        self.observe_counters(probe, &viewport, &mut events);

        self.scheduler.tick(dt_ms);
        for runtime in &mut self.counters {
            runtime.counter.tick(dt_ms);
        }

        let sink: &mut dyn StyleSink = &mut AttachedOnly {
            sink,
            parents: &self.parents,
            detached: &self.detached,
        };
        for section in &self.sections {
            for group in &section.groups {
                group.write_styles(&self.scheduler, &viewport, 0.0, sink);
            }
        }
        self.parallax
            .write_styles(&layer_bounds, &viewport, &self.scheduler, sink);
        for runtime in &self.counters {
            sink.set_text(runtime.node, &runtime.counter.display());
        }

        if !events.is_empty() {
            trace!(frame = self.frames, events = events.len(), "frame crossings");
        }
        FrameReport {
            events,
            viewport: Some(viewport),
        }
    }

    fn apply_input(&mut self, dt_ms: f32) {
        if let Some(y) = self.scroll.take() {
            self.viewport = self.viewport.scrolled_to(y);
        }
        if let Some((width, height)) = self.resize.advance(dt_ms) {
            debug!(width, height, "applying resize");
            self.viewport = self.viewport.resized(width, height);
        }
    }

    fn observe_sections(
        &mut self,
        probe: &dyn LayoutProbe,
        viewport: &Viewport,
        events: &mut SmallVec<[VisibilityEvent; 4]>,
    ) {
        for i in 0..self.sections.len() {
            let root = self.sections[i].root;
            let bounds = self.bounds_of(probe, root);
            let section = &mut self.sections[i];

            match section.tracker.observe(bounds, viewport) {
                Observation::Unchanged => {}
                Observation::Crossed(event) => {
                    debug!(
                        section = %section.name,
                        boundary = ?event.boundary,
                        direction = ?event.direction,
                        "section crossed"
                    );
                    for group in &mut section.groups {
                        group.handle(event.boundary, &mut self.scheduler);
                    }
                    events.push(event);
                }
                Observation::Detached(event) => {
                    debug!(section = %section.name, "section detached while active");
                    for group in &mut section.groups {
                        group.dispose(&mut self.scheduler, &mut self.disposal);
                    }
                    events.push(event);
                }
            }
        }
    }

    fn observe_counters(
        &mut self,
        probe: &dyn LayoutProbe,
        viewport: &Viewport,
        events: &mut SmallVec<[VisibilityEvent; 4]>,
    ) {
        for i in 0..self.counters.len() {
            let node = self.counters[i].node;
            let bounds = self.bounds_of(probe, node);
            let runtime = &mut self.counters[i];

            match runtime.tracker.observe(bounds, viewport) {
                Observation::Unchanged => {}
                Observation::Crossed(event) | Observation::Detached(event) => {
                    runtime.counter.set_in_view(event.boundary == Boundary::Enter);
                    events.push(event);
                }
            }
        }
    }

    fn write_final(&self, sink: &mut dyn StyleSink) {
        for section in &self.sections {
            for group in &section.groups {
                group.write_final(&self.viewport, sink);
            }
        }
        self.parallax.write_final(&self.viewport, sink);
        for runtime in &self.counters {
            sink.set_text(runtime.node, &runtime.counter.final_display());
        }
    }

    /// Update a counter's authored value
    pub fn set_counter_value(&mut self, node: NodeId, value: &str) -> bool {
        match self.counters.iter_mut().find(|c| c.node == node) {
            Some(runtime) => {
                runtime.counter.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Tear down: dispose every timeline and stop reacting to input
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn unmount(&mut self) {
        if self.mode == EngineMode::TornDown {
            return;
        }

        for section in &mut self.sections {
            for group in &mut section.groups {
                group.dispose(&mut self.scheduler, &mut self.disposal);
            }
            section.tracker.reset();
        }
        for runtime in &mut self.counters {
            runtime.counter.cancel();
            runtime.tracker.reset();
        }
        let disposed = self.disposal.dispose_all(&mut self.scheduler);
        self.scroll.clear();
        self.resize.clear();
        self.mode = EngineMode::TornDown;

        info!(disposed, frames = self.frames, "unmounted scroll engine");
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    /// Why the engine fell back to pass-through, if it did
    pub fn pass_through_reason(&self) -> Option<&RevealError> {
        self.unobservable.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn sections(&self) -> &[SectionRuntime] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&SectionRuntime> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn parallax(&self) -> &ParallaxCoordinator {
        &self.parallax
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// Number of timelines still registered for disposal
    pub fn live_timelines(&self) -> usize {
        self.disposal.len()
    }

    pub fn group_state(&self, section: &str, kind: GroupKind) -> Option<PlaybackState> {
        self.section(section)?.group(kind).map(|g| g.state())
    }

    pub fn group_position(&self, section: &str, kind: GroupKind) -> Option<f32> {
        self.section(section)?
            .group(kind)?
            .position_ms(&self.scheduler)
    }

    /// Current style of one grouped element, if its timeline is live
    pub fn element_style(&self, node: NodeId) -> Option<VisualProps> {
        self.sections
            .iter()
            .flat_map(|s| s.groups.iter())
            .filter_map(|g| g.timeline().and_then(|id| self.scheduler.get(id)))
            .flat_map(|t| t.sample_all(&self.viewport))
            .find(|(id, _)| *id == node)
            .map(|(_, props)| props)
    }

    pub fn counter(&self, node: NodeId) -> Option<&Counter> {
        self.counters
            .iter()
            .find(|c| c.node == node)
            .map(|c| &c.counter)
    }

    /// Whether any group, layer or counter is still mid-animation
    pub fn is_animating(&self) -> bool {
        self.scheduler.has_active_animations()
            || self.counters.iter().any(|c| c.counter.is_running())
    }
}

impl Drop for ScrollEngine {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn is_detached(
    node: NodeId,
    parents: &FxHashMap<NodeId, NodeId>,
    detached: &FxHashSet<NodeId>,
) -> bool {
    if detached.is_empty() {
        return false;
    }
    let mut current = Some(node);
    while let Some(id) = current {
        if detached.contains(&id) {
            return true;
        }
        current = parents.get(&id).copied();
    }
    false
}

/// Drops writes to nodes removed from the document
///
/// A detached element inside a still-attached section keeps its track, but
/// the host no longer receives styles for it.
struct AttachedOnly<'a> {
    sink: &'a mut dyn StyleSink,
    parents: &'a FxHashMap<NodeId, NodeId>,
    detached: &'a FxHashSet<NodeId>,
}

impl StyleSink for AttachedOnly<'_> {
    fn apply(&mut self, node: NodeId, props: &VisualProps) {
        if !is_detached(node, self.parents, self.detached) {
            self.sink.apply(node, props);
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if !is_detached(node, self.parents, self.detached) {
            self.sink.set_text(node, text);
        }
    }
}

fn parent_map(root: &SceneNode) -> FxHashMap<NodeId, NodeId> {
    let mut parents = FxHashMap::default();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        for child in &node.children {
            parents.insert(child.id, node.id);
            stack.push(child);
        }
    }
    parents
}
