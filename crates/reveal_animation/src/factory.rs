//! Animation group factory
//!
//! Turns a classified group (kind + elements) into an inert
//! [`AnimationDefinition`]: one staggered track per element, built from the
//! kind's [`MotionProfile`]. Nothing plays until the definition's timeline is
//! handed to a playback controller.

use reveal_core::{GroupKind, NodeId};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::presets::{MotionProfile, ProfileOverride};
use crate::timeline::{Timeline, Track};

/// Builds animation definitions from per-kind motion profiles
#[derive(Clone, Debug)]
pub struct AnimationGroupFactory {
    profiles: FxHashMap<GroupKind, MotionProfile>,
}

impl AnimationGroupFactory {
    /// Factory using the default preset for every kind
    pub fn new() -> Self {
        let profiles = GroupKind::ALL
            .into_iter()
            .map(|kind| (kind, MotionProfile::preset(kind)))
            .collect();
        Self { profiles }
    }

    /// Builder: patch the profile of one kind
    pub fn with_override(mut self, kind: GroupKind, patch: &ProfileOverride) -> Self {
        let base = self.profile(kind);
        self.profiles.insert(kind, base.patched(patch));
        self
    }

    /// Current profile for a kind
    pub fn profile(&self, kind: GroupKind) -> MotionProfile {
        self.profiles
            .get(&kind)
            .copied()
            .unwrap_or_else(|| MotionProfile::preset(kind))
    }

    /// Build the definition for one group of a section
    pub fn build(
        &self,
        kind: GroupKind,
        elements: &[NodeId],
        section_index: usize,
    ) -> AnimationDefinition {
        let profile = self.profile(kind);
        let from = profile.from_for_section(section_index);

        let tracks = elements
            .iter()
            .enumerate()
            .map(|(i, &node)| Track {
                node,
                delay_ms: profile.stagger.delay_for_index(i),
                duration_ms: profile.duration_ms,
                from,
                to: profile.to,
                easing: profile.easing,
            })
            .collect();

        AnimationDefinition {
            kind,
            section_index,
            tracks,
        }
    }
}

impl Default for AnimationGroupFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// An inert, fully-parameterised group animation
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDefinition {
    pub kind: GroupKind,
    pub section_index: usize,
    pub tracks: Vec<Track>,
}

impl AnimationDefinition {
    /// Stagger delay of each element, in element order
    pub fn delays(&self) -> Vec<u32> {
        self.tracks.iter().map(|t| t.delay_ms).collect()
    }

    /// Time until the last element settles
    pub fn duration_ms(&self) -> u32 {
        self.tracks.iter().map(Track::end_ms).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// A paused timeline positioned at the start
    pub fn to_timeline(&self) -> Timeline {
        Timeline::from_tracks(self.tracks.iter().cloned())
    }

    /// Serializable summary for plan output
    pub fn summary(&self) -> DefinitionSummary {
        let easing = self.tracks.first().map(|t| t.easing.name());
        DefinitionSummary {
            kind: self.kind,
            elements: self.tracks.iter().map(|t| t.node).collect(),
            delays_ms: self.delays(),
            duration_ms: self.duration_ms(),
            easing,
        }
    }
}

/// Plan-level view of a definition
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DefinitionSummary {
    pub kind: GroupKind,
    pub elements: Vec<NodeId>,
    pub delays_ms: Vec<u32>,
    pub duration_ms: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::units::Length;

    fn ids(range: std::ops::Range<u64>) -> Vec<NodeId> {
        range.map(NodeId).collect()
    }

    #[test]
    fn test_heading_and_card_delays() {
        let factory = AnimationGroupFactory::new();
        let headings = factory.build(GroupKind::Heading, &ids(1..4), 0);
        let cards = factory.build(GroupKind::Card, &ids(4..6), 0);

        assert_eq!(headings.delays(), vec![100, 200, 300]);
        assert_eq!(cards.delays(), vec![0, 150]);
        assert_eq!(headings.duration_ms(), 300 + 800);
    }

    #[test]
    fn test_stagger_monotonic_for_every_kind() {
        let factory = AnimationGroupFactory::new();
        for kind in GroupKind::ALL {
            let def = factory.build(kind, &ids(0..12), 3);
            assert!(
                def.delays().windows(2).all(|w| w[1] > w[0]),
                "{kind} delays not increasing"
            );
        }
    }

    #[test]
    fn test_media_direction_alternates() {
        let factory = AnimationGroupFactory::new();
        let even = factory.build(GroupKind::Media, &ids(0..1), 0);
        let odd = factory.build(GroupKind::Media, &ids(0..1), 1);
        assert_eq!(even.tracks[0].from.translate_x, Some(Length::Vw(-10.0)));
        assert_eq!(odd.tracks[0].from.translate_x, Some(Length::Vw(10.0)));
    }

    #[test]
    fn test_definition_is_inert() {
        let def = AnimationGroupFactory::new().build(GroupKind::Paragraph, &ids(0..2), 0);
        let timeline = def.to_timeline();
        assert!(!timeline.is_playing());
        assert_eq!(timeline.position_ms(), 0.0);
        assert_eq!(timeline.duration_ms(), def.duration_ms());
    }

    #[test]
    fn test_rebuild_is_identical() {
        let factory = AnimationGroupFactory::new();
        let a = factory.build(GroupKind::SectionShift, &ids(0..3), 5);
        let b = factory.build(GroupKind::SectionShift, &ids(0..3), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_override_applies() {
        let factory = AnimationGroupFactory::new().with_override(
            GroupKind::Heading,
            &ProfileOverride {
                easing: Some(Easing::Linear),
                ..Default::default()
            },
        );
        let def = factory.build(GroupKind::Heading, &ids(0..1), 0);
        assert_eq!(def.tracks[0].easing, Easing::Linear);
        assert_eq!(def.summary().easing.as_deref(), Some("linear"));
    }

    #[test]
    fn test_empty_group() {
        let def = AnimationGroupFactory::new().build(GroupKind::Control, &[], 0);
        assert!(def.is_empty());
        assert_eq!(def.duration_ms(), 0);
    }
}
