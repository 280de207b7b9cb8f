//! Motion presets for each animation group kind
//!
//! Every group kind has a default [`MotionProfile`]. Hosts can patch any
//! field of a preset with a [`ProfileOverride`], typically loaded from
//! configuration.

use reveal_core::GroupKind;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::props::MotionProps;
use crate::stagger::Stagger;
use crate::units::Length;

/// How one group kind enters view
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Properties before the element's tween starts
    pub from: MotionProps,
    /// Properties once the tween completes
    pub to: MotionProps,
    /// Per-element tween duration
    pub duration_ms: u32,
    pub stagger: Stagger,
    pub easing: Easing,
    /// Mirror horizontal offsets on odd-indexed sections
    pub alternate_x: bool,
}

impl MotionProfile {
    /// Default preset for a group kind
    pub fn preset(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Heading => Self {
                from: MotionProps::opacity(0.0).with_translate_y(Length::Px(50.0)),
                to: MotionProps::settled(),
                duration_ms: 800,
                stagger: Stagger::new(100, 100),
                easing: Easing::EaseOutCubic,
                alternate_x: false,
            },
            GroupKind::Paragraph => Self {
                from: MotionProps::opacity(0.0).with_translate_y(Length::Px(30.0)),
                to: MotionProps::settled(),
                duration_ms: 700,
                stagger: Stagger::new(200, 80),
                easing: Easing::EaseOut,
                alternate_x: false,
            },
            GroupKind::Control => Self {
                from: MotionProps::opacity(0.0)
                    .with_translate_y(Length::Px(20.0))
                    .with_scale(0.85),
                to: MotionProps::settled(),
                duration_ms: 500,
                stagger: Stagger::new(300, 100),
                easing: Easing::EaseOutBack,
                alternate_x: false,
            },
            GroupKind::Media => Self {
                from: MotionProps::opacity(0.0)
                    .with_translate_x(Length::Vw(-10.0))
                    .with_scale(0.95),
                to: MotionProps::settled(),
                duration_ms: 1000,
                stagger: Stagger::new(150, 120),
                easing: Easing::EaseOutCubic,
                alternate_x: true,
            },
            GroupKind::Card => Self {
                from: MotionProps::opacity(0.0)
                    .with_translate_y(Length::Px(60.0))
                    .with_scale(0.95),
                to: MotionProps::settled(),
                duration_ms: 600,
                stagger: Stagger::new(0, 150),
                easing: Easing::EaseOutCubic,
                alternate_x: false,
            },
            GroupKind::SectionShift => Self {
                from: MotionProps::opacity(0.0).with_translate_x(Length::Vw(-5.0)),
                to: MotionProps::settled(),
                duration_ms: 1200,
                stagger: Stagger::new(0, 80),
                easing: Easing::EaseOutQuart,
                alternate_x: true,
            },
            GroupKind::Parallax => Self {
                from: MotionProps::opacity(0.6).with_translate_y(Length::Vh(8.0)),
                to: MotionProps::settled(),
                duration_ms: 1500,
                stagger: Stagger::new(0, 200),
                easing: Easing::EaseInOutQuad,
                alternate_x: false,
            },
        }
    }

    /// Start properties for a section at `section_index`
    pub fn from_for_section(&self, section_index: usize) -> MotionProps {
        if self.alternate_x && section_index % 2 == 1 {
            self.from.mirrored_x()
        } else {
            self.from
        }
    }

    /// Apply a partial override on top of this profile
    pub fn patched(mut self, patch: &ProfileOverride) -> Self {
        if let Some(from) = patch.from {
            self.from = from;
        }
        if let Some(to) = patch.to {
            self.to = to;
        }
        if let Some(duration_ms) = patch.duration_ms {
            self.duration_ms = duration_ms;
        }
        if let Some(stagger) = patch.stagger {
            self.stagger = stagger;
        }
        if let Some(easing) = patch.easing {
            self.easing = easing;
        }
        if let Some(alternate_x) = patch.alternate_x {
            self.alternate_x = alternate_x;
        }
        self
    }
}

/// Partial replacement for a [`MotionProfile`]; unset fields keep the preset
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    pub from: Option<MotionProps>,
    pub to: Option<MotionProps>,
    pub duration_ms: Option<u32>,
    pub stagger: Option<Stagger>,
    pub easing: Option<Easing>,
    pub alternate_x: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_stagger_constants() {
        let heading = MotionProfile::preset(GroupKind::Heading).stagger;
        assert_eq!((heading.base_ms, heading.step_ms), (100, 100));
        let card = MotionProfile::preset(GroupKind::Card).stagger;
        assert_eq!((card.base_ms, card.step_ms), (0, 150));
    }

    #[test]
    fn test_every_preset_staggers_forward() {
        for kind in GroupKind::ALL {
            let profile = MotionProfile::preset(kind);
            assert!(profile.stagger.step_ms > 0, "{kind} has no stagger step");
            assert_eq!(profile.to, MotionProps::settled());
        }
    }

    #[test]
    fn test_media_alternates_by_section() {
        let media = MotionProfile::preset(GroupKind::Media);
        assert_eq!(media.from_for_section(0).translate_x, Some(Length::Vw(-10.0)));
        assert_eq!(media.from_for_section(1).translate_x, Some(Length::Vw(10.0)));
        assert_eq!(media.from_for_section(2).translate_x, Some(Length::Vw(-10.0)));

        let heading = MotionProfile::preset(GroupKind::Heading);
        assert_eq!(heading.from_for_section(1), heading.from);
    }

    #[test]
    fn test_patched_keeps_unset_fields() {
        let base = MotionProfile::preset(GroupKind::Card);
        let patched = base.patched(&ProfileOverride {
            duration_ms: Some(900),
            easing: Some(Easing::Linear),
            ..Default::default()
        });
        assert_eq!(patched.duration_ms, 900);
        assert_eq!(patched.easing, Easing::Linear);
        assert_eq!(patched.stagger, base.stagger);
        assert_eq!(patched.from, base.from);
    }
}
