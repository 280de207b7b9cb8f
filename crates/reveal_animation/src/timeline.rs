//! Timeline orchestration for a group of staggered tracks
//!
//! A timeline owns one track per element. Each track starts at its own
//! offset (the stagger delay) and tweens between two property sets. The
//! timeline has a single play head that can be played, paused and sought.

use reveal_core::{NodeId, Viewport};
use slotmap::{new_key_type, SlotMap};

use crate::easing::Easing;
use crate::props::{MotionProps, VisualProps};

new_key_type! {
    pub struct TrackId;
}

/// One element's tween within a timeline
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Element the tween drives
    pub node: NodeId,
    /// Offset in milliseconds from timeline start
    pub delay_ms: u32,
    pub duration_ms: u32,
    pub from: MotionProps,
    pub to: MotionProps,
    pub easing: Easing,
}

impl Track {
    /// Eased progress (0.0 to 1.0) of this track at timeline time `time_ms`
    pub fn progress_at(&self, time_ms: f32) -> f32 {
        let local = time_ms - self.delay_ms as f32;
        if local <= 0.0 {
            return 0.0;
        }
        if self.duration_ms == 0 || local >= self.duration_ms as f32 {
            return 1.0;
        }
        self.easing.apply(local / self.duration_ms as f32)
    }

    /// Resolved properties at timeline time `time_ms`
    pub fn sample(&self, time_ms: f32, viewport: &Viewport) -> VisualProps {
        let from = self.from.resolve(viewport);
        let to = self.to.resolve(viewport);
        from.lerp(&to, self.progress_at(time_ms))
    }

    /// Timeline time at which this track finishes
    pub fn end_ms(&self) -> u32 {
        self.delay_ms.saturating_add(self.duration_ms)
    }
}

/// A timeline that orchestrates one group's tracks
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tracks: SlotMap<TrackId, Track>,
    position_ms: f32,
    duration_ms: u32,
    playing: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from a list of tracks
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut timeline = Self::new();
        for track in tracks {
            timeline.add(track);
        }
        timeline
    }

    /// Add a track, extending the total duration if needed
    pub fn add(&mut self, track: Track) -> TrackId {
        self.duration_ms = self.duration_ms.max(track.end_ms());
        self.tracks.insert(track)
    }

    /// Start or resume from the current position
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Hold the current position
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Move the play head, clamped to the timeline's span
    pub fn seek(&mut self, position_ms: f32) {
        self.position_ms = position_ms.clamp(0.0, self.duration_ms as f32);
    }

    /// Seek to the start and play
    pub fn restart(&mut self) {
        self.seek(0.0);
        self.play();
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the play head has reached the end
    pub fn is_complete(&self) -> bool {
        self.position_ms >= self.duration_ms as f32
    }

    pub fn position_ms(&self) -> f32 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Advance the play head; stops at the end without looping
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }

        self.position_ms += dt_ms;

        if self.position_ms >= self.duration_ms as f32 {
            self.position_ms = self.duration_ms as f32;
            self.playing = false;
        }
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Tracks in insertion order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get the current value for a track
    pub fn value(&self, id: TrackId, viewport: &Viewport) -> Option<VisualProps> {
        let track = self.tracks.get(id)?;
        Some(track.sample(self.position_ms, viewport))
    }

    /// Current value of every track, keyed by element
    pub fn sample_all<'a>(
        &'a self,
        viewport: &'a Viewport,
    ) -> impl Iterator<Item = (NodeId, VisualProps)> + 'a {
        self.tracks
            .values()
            .map(move |track| (track.node, track.sample(self.position_ms, viewport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Length;

    fn fade_track(node: u64, delay_ms: u32) -> Track {
        Track {
            node: NodeId(node),
            delay_ms,
            duration_ms: 100,
            from: MotionProps::opacity(0.0).with_translate_y(Length::Px(40.0)),
            to: MotionProps::settled(),
            easing: Easing::Linear,
        }
    }

    #[test]
    fn test_duration_covers_staggered_tracks() {
        let timeline = Timeline::from_tracks([fade_track(1, 0), fade_track(2, 150)]);
        assert_eq!(timeline.duration_ms(), 250);
        assert_eq!(timeline.track_count(), 2);
    }

    #[test]
    fn test_tick_stops_at_end() {
        let mut timeline = Timeline::from_tracks([fade_track(1, 0)]);
        timeline.tick(50.0);
        assert_eq!(timeline.position_ms(), 0.0, "paused timelines don't move");

        timeline.play();
        timeline.tick(60.0);
        timeline.tick(60.0);
        assert_eq!(timeline.position_ms(), 100.0);
        assert!(!timeline.is_playing());
        assert!(timeline.is_complete());
    }

    #[test]
    fn test_sampling_respects_delay() {
        let vp = Viewport::default();
        let mut timeline = Timeline::new();
        let first = timeline.add(fade_track(1, 0));
        let second = timeline.add(fade_track(2, 100));

        timeline.seek(50.0);
        let a = timeline.value(first, &vp).unwrap();
        let b = timeline.value(second, &vp).unwrap();
        assert_eq!(a.opacity, 0.5);
        assert_eq!(a.translate_y, 20.0);
        assert_eq!(b.opacity, 0.0, "second track has not started");

        timeline.seek(500.0);
        assert_eq!(timeline.position_ms(), 200.0);
        assert_eq!(timeline.value(second, &vp).unwrap(), VisualProps::IDENTITY);
    }

    #[test]
    fn test_restart_rewinds() {
        let mut timeline = Timeline::from_tracks([fade_track(1, 0)]);
        timeline.play();
        timeline.tick(70.0);
        timeline.restart();
        assert_eq!(timeline.position_ms(), 0.0);
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_sample_all_in_insertion_order() {
        let vp = Viewport::default();
        let timeline = Timeline::from_tracks([fade_track(5, 0), fade_track(3, 10)]);
        let nodes: Vec<NodeId> = timeline.sample_all(&vp).map(|(n, _)| n).collect();
        assert_eq!(nodes, vec![NodeId(5), NodeId(3)]);
    }
}
