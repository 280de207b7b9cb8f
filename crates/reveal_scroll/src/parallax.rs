//! Ambient parallax layers
//!
//! Decorative layers that sit outside every section are tracked on their
//! own. Each layer fades in when it reaches the viewport center (center
//! thresholds) and, while attached, drifts vertically in proportion to its
//! distance from the viewport center:
//!
//! ```text
//! drift_y = (viewport_center - layer_center) * speed
//! ```

use reveal_animation::{AnimationGroupFactory, AnimationScheduler};
use reveal_core::{GroupKind, NodeId, Rect, Viewport, VisibilityEvent};
use smallvec::SmallVec;
use tracing::debug;

use crate::disposal::DisposalManager;
use crate::group::GroupPlayback;
use crate::host::StyleSink;
use crate::playback::PlaybackState;
use crate::scanner::AmbientLayer;
use crate::visibility::{Observation, VisibilityThresholds, VisibilityTracker};

/// Vertical drift of a layer for the current viewport
pub fn drift_px(bounds: &Rect, viewport: &Viewport, speed: f32) -> f32 {
    let layer_center = bounds.top() + bounds.height * 0.5;
    (viewport.center() - layer_center) * speed
}

#[derive(Debug)]
pub struct ParallaxLayer {
    node: NodeId,
    speed: f32,
    tracker: VisibilityTracker,
    playback: GroupPlayback,
}

impl ParallaxLayer {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn position_ms(&self, scheduler: &AnimationScheduler) -> Option<f32> {
        self.playback.position_ms(scheduler)
    }
}

/// Drives every ambient layer independently of sections
#[derive(Debug)]
pub struct ParallaxCoordinator {
    thresholds: VisibilityThresholds,
    layers: Vec<ParallaxLayer>,
}

impl ParallaxCoordinator {
    pub fn new(thresholds: VisibilityThresholds) -> Self {
        Self {
            thresholds,
            layers: Vec::new(),
        }
    }

    pub fn add(
        &mut self,
        layer: AmbientLayer,
        factory: &AnimationGroupFactory,
        scheduler: &mut AnimationScheduler,
        disposal: &mut DisposalManager,
    ) {
        let definition = factory.build(GroupKind::Parallax, &[layer.node], 0);
        self.layers.push(ParallaxLayer {
            node: layer.node,
            speed: layer.speed,
            tracker: VisibilityTracker::new(layer.node, self.thresholds),
            playback: GroupPlayback::new(definition, scheduler, disposal),
        });
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn layer(&self, node: NodeId) -> Option<&ParallaxLayer> {
        self.layers.iter().find(|l| l.node == node)
    }

    /// Observe every layer and route crossings to its playback
    pub fn observe(
        &mut self,
        bounds: &dyn Fn(NodeId) -> Option<Rect>,
        viewport: &Viewport,
        scheduler: &mut AnimationScheduler,
        disposal: &mut DisposalManager,
        events: &mut SmallVec<[VisibilityEvent; 4]>,
    ) {
        for layer in &mut self.layers {
            match layer.tracker.observe(bounds(layer.node), viewport) {
                Observation::Unchanged => {}
                Observation::Crossed(event) => {
                    layer.playback.handle(event.boundary, scheduler);
                    events.push(event);
                }
                Observation::Detached(event) => {
                    debug!(node = %layer.node, "parallax layer detached");
                    layer.playback.dispose(scheduler, disposal);
                    events.push(event);
                }
            }
        }
    }

    /// Write each attached layer's style plus its drift
    pub fn write_styles(
        &self,
        bounds: &dyn Fn(NodeId) -> Option<Rect>,
        viewport: &Viewport,
        scheduler: &AnimationScheduler,
        sink: &mut dyn StyleSink,
    ) {
        for layer in &self.layers {
            let Some(rect) = bounds(layer.node) else {
                continue;
            };
            let drift = drift_px(&rect, viewport, layer.speed);
            layer.playback.write_styles(scheduler, viewport, drift, sink);
        }
    }

    pub fn write_final(&self, viewport: &Viewport, sink: &mut dyn StyleSink) {
        for layer in &self.layers {
            layer.playback.write_final(viewport, sink);
        }
    }
}
