//! Playback controller
//!
//! One controller drives every replayable target (group timelines, ambient
//! layers, counters) from visibility crossings. The transition table lives in
//! a [`StateMachine`]; its effects are plain data applied to a [`Playable`].
//!
//! | From            | Event | To      | Effects          |
//! |-----------------|-------|---------|------------------|
//! | Idle / Paused   | Enter | Playing | seek start, play |
//! | Playing         | Leave | Paused  | pause, seek start|
//!
//! Every other combination is a no-op, so duplicate enters while playing
//! never restart a running animation.

use reveal_animation::Timeline;
use reveal_core::{Boundary, StateMachine, Transition};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Lifecycle of a replayable animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Never entered view
    #[default]
    Idle,
    /// Entered view; playing or finished playing
    Playing,
    /// Left view and rewound, ready to replay
    Paused,
}

/// Effect emitted by a playback transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEffect {
    SeekStart,
    Play,
    Pause,
}

/// Something a [`PlaybackController`] can drive
pub trait Playable {
    fn play(&mut self);
    fn pause(&mut self);
    /// Rewind to the initial (hidden) state
    fn seek_start(&mut self);
}

impl Playable for Timeline {
    fn play(&mut self) {
        Timeline::play(self);
    }

    fn pause(&mut self) {
        Timeline::pause(self);
    }

    fn seek_start(&mut self) {
        self.seek(0.0);
    }
}

/// Replays a target on every enter and rewinds it on every leave
#[derive(Clone, Debug)]
pub struct PlaybackController {
    machine: StateMachine<PlaybackState, Boundary, PlaybackEffect>,
}

impl PlaybackController {
    pub fn new() -> Self {
        use PlaybackState::*;

        let machine = StateMachine::builder(Idle)
            .transition(
                Transition::new(Idle, Boundary::Enter, Playing)
                    .with_effect(PlaybackEffect::SeekStart)
                    .with_effect(PlaybackEffect::Play),
            )
            .transition(
                Transition::new(Paused, Boundary::Enter, Playing)
                    .with_effect(PlaybackEffect::SeekStart)
                    .with_effect(PlaybackEffect::Play),
            )
            .transition(
                Transition::new(Playing, Boundary::Leave, Paused)
                    .with_effect(PlaybackEffect::Pause)
                    .with_effect(PlaybackEffect::SeekStart),
            )
            .build();

        Self { machine }
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.current_state()
    }

    /// Feed a boundary crossing; returns the new state when a transition fired
    pub fn handle<P>(&mut self, boundary: Boundary, target: &mut P) -> Option<PlaybackState>
    where
        P: Playable + ?Sized,
    {
        let fired = self.machine.send(boundary)?;
        for effect in &fired.effects {
            match effect {
                PlaybackEffect::SeekStart => target.seek_start(),
                PlaybackEffect::Play => target.play(),
                PlaybackEffect::Pause => target.pause(),
            }
        }
        trace!(from = ?fired.from, to = ?fired.to, ?boundary, "playback transition");
        Some(fired.to)
    }

    /// Number of transitions fired so far (bounded by the history limit)
    pub fn transitions(&self) -> usize {
        self.machine.history().len()
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CallLog {
        calls: Vec<&'static str>,
    }

    impl Playable for CallLog {
        fn play(&mut self) {
            self.calls.push("play");
        }
        fn pause(&mut self) {
            self.calls.push("pause");
        }
        fn seek_start(&mut self) {
            self.calls.push("seek");
        }
    }

    #[test]
    fn test_enter_seeks_then_plays() {
        let mut controller = PlaybackController::new();
        let mut log = CallLog::default();
        assert_eq!(
            controller.handle(Boundary::Enter, &mut log),
            Some(PlaybackState::Playing)
        );
        assert_eq!(log.calls, vec!["seek", "play"]);
    }

    #[test]
    fn test_leave_pauses_then_rewinds() {
        let mut controller = PlaybackController::new();
        let mut log = CallLog::default();
        controller.handle(Boundary::Enter, &mut log);
        log.calls.clear();

        assert_eq!(
            controller.handle(Boundary::Leave, &mut log),
            Some(PlaybackState::Paused)
        );
        assert_eq!(log.calls, vec!["pause", "seek"]);
    }

    #[test]
    fn test_noop_transitions() {
        let mut controller = PlaybackController::new();
        let mut log = CallLog::default();

        // Leave before ever entering
        assert_eq!(controller.handle(Boundary::Leave, &mut log), None);
        assert_eq!(controller.state(), PlaybackState::Idle);

        controller.handle(Boundary::Enter, &mut log);
        log.calls.clear();
        // Duplicate enter while playing
        assert_eq!(controller.handle(Boundary::Enter, &mut log), None);
        assert!(log.calls.is_empty());

        controller.handle(Boundary::Leave, &mut log);
        log.calls.clear();
        // Duplicate leave while paused
        assert_eq!(controller.handle(Boundary::Leave, &mut log), None);
        assert!(log.calls.is_empty());
        assert_eq!(controller.transitions(), 2);
    }

    #[test]
    fn test_replays_timeline_from_start() {
        use reveal_animation::{AnimationGroupFactory, Timeline};
        use reveal_core::{GroupKind, NodeId};

        let def = AnimationGroupFactory::new().build(GroupKind::Heading, &[NodeId(1)], 0);
        let mut timeline: Timeline = def.to_timeline();
        let mut controller = PlaybackController::new();

        controller.handle(Boundary::Enter, &mut timeline);
        timeline.tick(450.0);
        assert_eq!(timeline.position_ms(), 450.0);

        controller.handle(Boundary::Leave, &mut timeline);
        assert!(!timeline.is_playing());
        assert_eq!(timeline.position_ms(), 0.0);

        controller.handle(Boundary::Enter, &mut timeline);
        assert!(timeline.is_playing());
        assert_eq!(timeline.position_ms(), 0.0);
    }
}
