//! A group's timeline paired with the controller that replays it

use reveal_animation::{AnimationDefinition, AnimationScheduler, TimelineId};
use reveal_core::{Boundary, GroupKind, NodeId, Viewport};

use crate::disposal::DisposalManager;
use crate::host::StyleSink;
use crate::playback::{PlaybackController, PlaybackState};

#[derive(Debug)]
pub struct GroupPlayback {
    definition: AnimationDefinition,
    timeline: Option<TimelineId>,
    controller: PlaybackController,
}

impl GroupPlayback {
    /// Register the definition's timeline (paused at its start)
    pub fn new(
        definition: AnimationDefinition,
        scheduler: &mut AnimationScheduler,
        disposal: &mut DisposalManager,
    ) -> Self {
        let id = scheduler.add_timeline(definition.to_timeline());
        disposal.register(id);
        Self {
            definition,
            timeline: Some(id),
            controller: PlaybackController::new(),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &AnimationDefinition {
        &self.definition
    }

    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.definition.tracks.iter().map(|t| t.node)
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    pub fn is_disposed(&self) -> bool {
        self.timeline.is_none()
    }

    /// Play head position, or `None` once disposed
    pub fn position_ms(&self, scheduler: &AnimationScheduler) -> Option<f32> {
        self.timeline
            .and_then(|id| scheduler.get(id))
            .map(|t| t.position_ms())
    }

    /// Route a boundary crossing to the timeline
    pub fn handle(
        &mut self,
        boundary: Boundary,
        scheduler: &mut AnimationScheduler,
    ) -> Option<PlaybackState> {
        let timeline = scheduler.get_mut(self.timeline?)?;
        self.controller.handle(boundary, timeline)
    }

    /// Rewind and release the timeline
    pub fn dispose(&mut self, scheduler: &mut AnimationScheduler, disposal: &mut DisposalManager) {
        self.handle(Boundary::Leave, scheduler);
        if let Some(id) = self.timeline.take() {
            disposal.dispose(id, scheduler);
        }
    }

    /// Write every element's current style, shifted vertically by `offset_y`
    pub fn write_styles(
        &self,
        scheduler: &AnimationScheduler,
        viewport: &Viewport,
        offset_y: f32,
        sink: &mut dyn StyleSink,
    ) {
        let Some(timeline) = self.timeline.and_then(|id| scheduler.get(id)) else {
            return;
        };
        for (node, props) in timeline.sample_all(viewport) {
            sink.apply(node, &props.offset_y(offset_y));
        }
    }

    /// Write every element's resting style
    pub fn write_final(&self, viewport: &Viewport, sink: &mut dyn StyleSink) {
        for track in &self.definition.tracks {
            sink.apply(track.node, &track.to.resolve(viewport));
        }
    }
}
