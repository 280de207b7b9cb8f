//! Animation scheduler
//!
//! Owns every live timeline and advances the playing ones each frame.
//! Timelines are addressed by [`TimelineId`] handles; a removed handle simply
//! stops resolving, so stale handles are harmless.

use std::time::Instant;

use slotmap::{new_key_type, SlotMap};

use crate::timeline::Timeline;

new_key_type! {
    pub struct TimelineId;
}

/// The animation scheduler that ticks all active timelines
#[derive(Debug)]
pub struct AnimationScheduler {
    timelines: SlotMap<TimelineId, Timeline>,
    last_frame: Instant,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            timelines: SlotMap::with_key(),
            last_frame: Instant::now(),
        }
    }

    pub fn add_timeline(&mut self, timeline: Timeline) -> TimelineId {
        self.timelines.insert(timeline)
    }

    pub fn get(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(id)
    }

    pub fn get_mut(&mut self, id: TimelineId) -> Option<&mut Timeline> {
        self.timelines.get_mut(id)
    }

    pub fn contains(&self, id: TimelineId) -> bool {
        self.timelines.contains_key(id)
    }

    pub fn remove(&mut self, id: TimelineId) -> Option<Timeline> {
        self.timelines.remove(id)
    }

    /// Advance every playing timeline by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        for (_, timeline) in self.timelines.iter_mut() {
            timeline.tick(dt_ms);
        }
        self.last_frame = Instant::now();
    }

    /// Advance by the wall-clock time since the previous tick
    ///
    /// Returns the elapsed milliseconds that were applied.
    pub fn tick_wall_clock(&mut self) -> f32 {
        let now = Instant::now();
        let dt_ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        for (_, timeline) in self.timelines.iter_mut() {
            timeline.tick(dt_ms);
        }
        self.last_frame = now;
        dt_ms
    }

    /// Check if any timeline is still playing
    pub fn has_active_animations(&self) -> bool {
        self.timelines.values().any(Timeline::is_playing)
    }

    /// Iterate over all timelines
    pub fn iter(&self) -> impl Iterator<Item = (TimelineId, &Timeline)> {
        self.timelines.iter()
    }

    /// Get the number of timelines in the scheduler
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
