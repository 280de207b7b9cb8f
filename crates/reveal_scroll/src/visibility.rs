//! Viewport visibility tracking
//!
//! A [`VisibilityTracker`] follows one region of the document and reports
//! repeatable enter/leave crossings. Two zones are involved:
//!
//! ```text
//!  viewport top ──────────────  leave.top   (offset 0)
//!                               enter.top   (offset +150)
//!        ┌──────────┐
//!        │  active  │
//!        └──────────┘
//!                               enter.bottom (offset −100)
//!  viewport bottom ───────────  leave.bottom (offset 0)
//! ```
//!
//! A region becomes active once it overlaps the enter zone and stays active
//! until it no longer overlaps the leave zone. The gap between the two zones
//! is hysteresis: a region hovering on one line never flickers.

use reveal_core::{
    NodeId, Rect, Result, RevealError, ScrollDirection, Viewport, VisibilityEvent,
};
use serde::{Deserialize, Serialize};

/// Reference point inside the viewport
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Center,
    Bottom,
}

/// A horizontal line in the viewport: an anchor plus a pixel offset (positive = down)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerLine {
    pub anchor: Anchor,
    #[serde(default)]
    pub offset_px: f32,
}

impl TriggerLine {
    pub const fn new(anchor: Anchor, offset_px: f32) -> Self {
        Self { anchor, offset_px }
    }

    /// Document y of this line for the given viewport
    pub fn resolve(&self, viewport: &Viewport) -> f32 {
        let base = match self.anchor {
            Anchor::Top => viewport.top(),
            Anchor::Center => viewport.center(),
            Anchor::Bottom => viewport.bottom(),
        };
        base + self.offset_px
    }
}

/// Band between two trigger lines
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    pub top: TriggerLine,
    pub bottom: TriggerLine,
}

impl TriggerZone {
    /// Document span `(top, bottom)` of this zone
    ///
    /// A zone whose lines cross (very short viewports) collapses onto the
    /// midpoint, so it still triggers for regions spanning that line.
    pub fn span(&self, viewport: &Viewport) -> (f32, f32) {
        let top = self.top.resolve(viewport);
        let bottom = self.bottom.resolve(viewport);
        if top < bottom {
            (top, bottom)
        } else {
            let mid = (top + bottom) * 0.5;
            (mid, mid)
        }
    }

    pub fn overlaps(&self, rect: &Rect, viewport: &Viewport) -> bool {
        span_overlaps(rect, self.span(viewport))
    }
}

/// A collapsed span only matches regions straddling its line
fn span_overlaps(rect: &Rect, (top, bottom): (f32, f32)) -> bool {
    if top == bottom {
        return rect.top() < top && rect.bottom() > top;
    }
    rect.overlaps_span(top, bottom)
}

/// Enter and leave zones for one kind of tracked region
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityThresholds {
    pub enter: TriggerZone,
    pub leave: TriggerZone,
}

impl VisibilityThresholds {
    /// Content sections: enter 150px below the top / 100px above the bottom,
    /// leave at the viewport edges
    pub const fn sections() -> Self {
        Self {
            enter: TriggerZone {
                top: TriggerLine::new(Anchor::Top, 150.0),
                bottom: TriggerLine::new(Anchor::Bottom, -100.0),
            },
            leave: TriggerZone {
                top: TriggerLine::new(Anchor::Top, 0.0),
                bottom: TriggerLine::new(Anchor::Bottom, 0.0),
            },
        }
    }

    /// Decorative layers: enter once the region reaches the viewport center
    pub const fn center() -> Self {
        Self {
            enter: TriggerZone {
                top: TriggerLine::new(Anchor::Top, 0.0),
                bottom: TriggerLine::new(Anchor::Center, 0.0),
            },
            leave: TriggerZone {
                top: TriggerLine::new(Anchor::Top, 0.0),
                bottom: TriggerLine::new(Anchor::Bottom, 0.0),
            },
        }
    }

    /// Enter span for `viewport`, clamped into the leave span
    ///
    /// Anything overlapping the result also overlaps the leave zone, so a
    /// region can never enter and leave on the same layout.
    pub fn enter_span(&self, viewport: &Viewport) -> (f32, f32) {
        let (leave_top, leave_bottom) = self.leave.span(viewport);
        let (top, bottom) = self.enter.span(viewport);
        (
            top.clamp(leave_top, leave_bottom),
            bottom.clamp(leave_top, leave_bottom),
        )
    }

    /// Check that the enter zone sits inside the leave zone for `viewport`
    ///
    /// Otherwise a region could satisfy "entered" and "left" at once.
    pub fn validate(&self, viewport: &Viewport) -> Result<()> {
        let (enter_top, enter_bottom) = self.enter.span(viewport);
        let (leave_top, leave_bottom) = self.leave.span(viewport);
        if enter_top < leave_top || enter_bottom > leave_bottom {
            return Err(RevealError::InvalidConfig(format!(
                "enter zone ({enter_top}..{enter_bottom}) must lie within leave zone \
                 ({leave_top}..{leave_bottom})"
            )));
        }
        Ok(())
    }
}

impl Default for VisibilityThresholds {
    fn default() -> Self {
        Self::sections()
    }
}

/// Result of one observation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Observation {
    /// No boundary was crossed
    Unchanged,
    /// The region crossed into or out of the active zone
    Crossed(VisibilityEvent),
    /// The region vanished while active
    Detached(VisibilityEvent),
}

/// Tracks one region's enter/leave transitions
#[derive(Clone, Debug)]
pub struct VisibilityTracker {
    region: NodeId,
    thresholds: VisibilityThresholds,
    active: bool,
    last_scroll: Option<f32>,
}

impl VisibilityTracker {
    pub fn new(region: NodeId, thresholds: VisibilityThresholds) -> Self {
        Self {
            region,
            thresholds,
            active: false,
            last_scroll: None,
        }
    }

    pub fn region(&self) -> NodeId {
        self.region
    }

    /// Whether the region is currently inside the active zone
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Observe the region's current bounds (`None` when detached)
    pub fn observe(&mut self, bounds: Option<Rect>, viewport: &Viewport) -> Observation {
        let direction = match self.last_scroll {
            Some(previous) => ScrollDirection::between(previous, viewport.scroll_y),
            None => ScrollDirection::None,
        };
        self.last_scroll = Some(viewport.scroll_y);

        let Some(rect) = bounds else {
            if self.active {
                self.active = false;
                return Observation::Detached(VisibilityEvent::leave(self.region, direction));
            }
            return Observation::Unchanged;
        };

        if self.active {
            if !self.thresholds.leave.overlaps(&rect, viewport) {
                self.active = false;
                return Observation::Crossed(VisibilityEvent::leave(self.region, direction));
            }
        } else if span_overlaps(&rect, self.thresholds.enter_span(viewport)) {
            self.active = true;
            return Observation::Crossed(VisibilityEvent::enter(self.region, direction));
        }

        Observation::Unchanged
    }

    /// Forget all state, as if freshly created
    pub fn reset(&mut self) {
        self.active = false;
        self.last_scroll = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::Boundary;

    const VIEW_H: f32 = 800.0;

    fn vp(scroll_y: f32) -> Viewport {
        Viewport::new(scroll_y, 1200.0, VIEW_H)
    }

    /// Section spanning document y 1000..1400
    fn section() -> Option<Rect> {
        Some(Rect::new(0.0, 1000.0, 1200.0, 400.0))
    }

    fn boundary(obs: Observation) -> Option<Boundary> {
        match obs {
            Observation::Crossed(ev) | Observation::Detached(ev) => Some(ev.boundary),
            Observation::Unchanged => None,
        }
    }

    #[test]
    fn test_enters_past_bottom_offset() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        // enter line = scroll + 700; section top at 1000
        assert_eq!(boundary(tracker.observe(section(), &vp(300.0))), None);
        assert_eq!(boundary(tracker.observe(section(), &vp(301.0))), Some(Boundary::Enter));
        assert!(tracker.is_active());
    }

    #[test]
    fn test_hysteresis_suppresses_flicker() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        tracker.observe(section(), &vp(320.0));
        assert!(tracker.is_active());

        // Wobble between the enter line and the leave line: no reports
        for scroll in [290.0, 310.0, 250.0, 330.0, 201.0] {
            assert_eq!(tracker.observe(section(), &vp(scroll)), Observation::Unchanged);
        }

        // Section top drops below the viewport bottom: leave
        let obs = tracker.observe(section(), &vp(200.0));
        match obs {
            Observation::Crossed(ev) => {
                assert_eq!(ev.boundary, Boundary::Leave);
                assert_eq!(ev.direction, ScrollDirection::Backward);
            }
            other => panic!("expected leave, got {other:?}"),
        }
    }

    #[test]
    fn test_repeats_every_crossing() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        let mut boundaries = Vec::new();
        for scroll in [0.0, 400.0, 0.0, 400.0, 0.0] {
            if let Some(b) = boundary(tracker.observe(section(), &vp(scroll))) {
                boundaries.push(b);
            }
        }
        assert_eq!(
            boundaries,
            vec![Boundary::Enter, Boundary::Leave, Boundary::Enter, Boundary::Leave]
        );
    }

    #[test]
    fn test_leaves_past_top_when_scrolling_forward() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        tracker.observe(section(), &vp(600.0));
        assert!(tracker.is_active());
        // Section bottom (1400) above viewport top
        let obs = tracker.observe(section(), &vp(1400.0));
        assert!(matches!(
            obs,
            Observation::Crossed(VisibilityEvent {
                boundary: Boundary::Leave,
                direction: ScrollDirection::Forward,
                ..
            })
        ));
        // Scrolling back up re-enters once the bottom is 150px into the viewport
        assert_eq!(boundary(tracker.observe(section(), &vp(1260.0))), None);
        assert_eq!(boundary(tracker.observe(section(), &vp(1249.0))), Some(Boundary::Enter));
    }

    #[test]
    fn test_detached_inactive_region_is_silent() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        assert_eq!(tracker.observe(None, &vp(500.0)), Observation::Unchanged);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_detached_active_region_leaves() {
        let mut tracker = VisibilityTracker::new(NodeId(1), VisibilityThresholds::sections());
        tracker.observe(section(), &vp(500.0));
        let obs = tracker.observe(None, &vp(500.0));
        assert!(matches!(obs, Observation::Detached(ev) if ev.boundary == Boundary::Leave));
        assert_eq!(tracker.observe(None, &vp(500.0)), Observation::Unchanged);
    }

    #[test]
    fn test_center_thresholds() {
        let mut tracker = VisibilityTracker::new(NodeId(9), VisibilityThresholds::center());
        let layer = Some(Rect::new(0.0, 1000.0, 100.0, 100.0));
        // center line = scroll + 400
        assert_eq!(boundary(tracker.observe(layer, &vp(600.0))), None);
        assert_eq!(boundary(tracker.observe(layer, &vp(601.0))), Some(Boundary::Enter));
    }

    #[test]
    fn test_collapsed_zone_on_short_viewport() {
        let short = Viewport::new(0.0, 400.0, 200.0);
        let zone = VisibilityThresholds::sections().enter;
        // top line 150, bottom line 100: collapses to 125
        assert_eq!(zone.span(&short), (125.0, 125.0));
        assert!(zone.overlaps(&Rect::new(0.0, 100.0, 10.0, 50.0), &short));
        assert!(!zone.overlaps(&Rect::new(0.0, 130.0, 10.0, 50.0), &short));
    }

    #[test]
    fn test_enter_span_clamped_on_short_viewport() {
        let mut thresholds = VisibilityThresholds::sections();
        thresholds.enter.top = TriggerLine::new(Anchor::Top, 600.0);
        thresholds.enter.bottom = TriggerLine::new(Anchor::Bottom, -50.0);
        assert!(thresholds.validate(&Viewport::default()).is_ok());

        // Raw enter lines 600 and 350 would collapse to 475, outside 0..400
        let short = Viewport::new(0.0, 1280.0, 400.0);
        assert_eq!(thresholds.enter_span(&short), (400.0, 400.0));

        let mut tracker = VisibilityTracker::new(NodeId(1), thresholds);
        let region = Some(Rect::new(0.0, 450.0, 1280.0, 50.0));
        for _ in 0..8 {
            assert_eq!(tracker.observe(region, &short), Observation::Unchanged);
        }
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_validate() {
        assert!(VisibilityThresholds::sections().validate(&Viewport::default()).is_ok());
        assert!(VisibilityThresholds::center().validate(&Viewport::default()).is_ok());

        let mut inverted = VisibilityThresholds::sections();
        inverted.enter.bottom = TriggerLine::new(Anchor::Bottom, 50.0);
        assert!(inverted.validate(&Viewport::default()).is_err());
    }
}
