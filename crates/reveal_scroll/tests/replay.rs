//! End-to-end replay behaviour of a mounted engine

use reveal_animation::VisualProps;
use reveal_core::{Boundary, GroupKind, NodeId, NodeRole, Rect, Scene, SceneNode, Viewport};
use reveal_scroll::{
    EngineConfig, EngineMode, PlaybackState, ScrollEngine, StaticLayout, StyleLog,
};

const VIEW: Viewport = Viewport::new(0.0, 1280.0, 800.0);

/// Intro filler (0..1000), then a features section (1000..1800) holding
/// three headings, two cards (one with a counter) and an ambient layer below.
fn landing_page() -> Scene {
    Scene::new(
        SceneNode::new(0, NodeRole::Container)
            .child(
                SceneNode::new(1, NodeRole::section("intro"))
                    .with_bounds(Rect::new(0.0, 0.0, 1280.0, 1000.0)),
            )
            .child(
                SceneNode::new(10, NodeRole::section("features"))
                    .with_bounds(Rect::new(0.0, 1000.0, 1280.0, 800.0))
                    .child(SceneNode::new(11, NodeRole::heading(2)))
                    .child(SceneNode::new(12, NodeRole::heading(3)))
                    .child(SceneNode::new(13, NodeRole::heading(3)))
                    .child(
                        SceneNode::new(14, NodeRole::Card)
                            .with_bounds(Rect::new(0.0, 1400.0, 600.0, 300.0))
                            .child(
                                SceneNode::new(15, NodeRole::counter("1.3B"))
                                    .with_bounds(Rect::new(0.0, 1450.0, 200.0, 60.0)),
                            ),
                    )
                    .child(SceneNode::new(16, NodeRole::Card)),
            )
            .child(
                SceneNode::new(90, NodeRole::parallax(0.2))
                    .with_bounds(Rect::new(0.0, 2400.0, 1280.0, 400.0)),
            ),
    )
}

struct Harness {
    engine: ScrollEngine,
    layout: StaticLayout,
    styles: StyleLog,
}

impl Harness {
    fn new() -> Self {
        let scene = landing_page();
        let layout = StaticLayout::from_scene(&scene, Some(VIEW));
        let engine = ScrollEngine::mount(&scene, &layout, EngineConfig::default()).unwrap();
        Self {
            engine,
            layout,
            styles: StyleLog::new(),
        }
    }

    fn scroll(&mut self, y: f32) -> Vec<(NodeId, Boundary)> {
        self.engine.on_scroll(y);
        self.layout.scroll_to(y);
        self.tick(16.0)
    }

    fn tick(&mut self, dt_ms: f32) -> Vec<(NodeId, Boundary)> {
        self.engine
            .frame(dt_ms, &self.layout, &mut self.styles)
            .events
            .iter()
            .map(|e| (e.region, e.boundary))
            .collect()
    }

    fn heading_delays(&self) -> Vec<u32> {
        self.engine
            .section("features")
            .and_then(|s| s.group(GroupKind::Heading))
            .map(|g| g.definition().delays())
            .unwrap_or_default()
    }

    fn card_delays(&self) -> Vec<u32> {
        self.engine
            .section("features")
            .and_then(|s| s.group(GroupKind::Card))
            .map(|g| g.definition().delays())
            .unwrap_or_default()
    }

    fn state(&self, kind: GroupKind) -> Option<PlaybackState> {
        self.engine.group_state("features", kind)
    }

    fn position(&self, kind: GroupKind) -> Option<f32> {
        self.engine.group_position("features", kind)
    }
}

#[test]
fn test_example_scenario() {
    let mut h = Harness::new();
    h.tick(16.0);
    assert_eq!(h.heading_delays(), vec![100, 200, 300]);
    assert_eq!(h.card_delays(), vec![0, 150]);
    assert_eq!(h.state(GroupKind::Heading), Some(PlaybackState::Idle));

    // Section top (1000) passes the enter line (scroll + 700)
    let events = h.scroll(400.0);
    assert!(events.contains(&(NodeId(10), Boundary::Enter)));
    assert_eq!(h.state(GroupKind::Heading), Some(PlaybackState::Playing));
    assert_eq!(h.state(GroupKind::Card), Some(PlaybackState::Playing));

    h.tick(250.0);
    assert!(h.position(GroupKind::Heading).unwrap() > 0.0);

    // Back above: the section top drops below the viewport bottom
    let events = h.scroll(0.0);
    assert!(events.contains(&(NodeId(10), Boundary::Leave)));
    assert_eq!(h.state(GroupKind::Heading), Some(PlaybackState::Paused));
    assert_eq!(h.position(GroupKind::Heading), Some(0.0));
    assert_eq!(h.position(GroupKind::Card), Some(0.0));

    // Re-entry replays with the same parameters
    h.scroll(400.0);
    assert_eq!(h.state(GroupKind::Heading), Some(PlaybackState::Playing));
    assert_eq!(h.heading_delays(), vec![100, 200, 300]);
    assert_eq!(h.card_delays(), vec![0, 150]);
}

#[test]
fn test_duplicate_enter_does_not_restart() {
    let mut h = Harness::new();
    h.scroll(400.0);
    h.tick(300.0);
    let before = h.position(GroupKind::Heading).unwrap();

    // Movements inside the active band, observed without advancing time
    for y in [420.0, 380.0, 450.0] {
        h.engine.on_scroll(y);
        h.layout.scroll_to(y);
        let events = h.tick(0.0);
        assert!(events.iter().all(|(region, _)| *region != NodeId(10)));
        assert_eq!(h.position(GroupKind::Heading), Some(before));
        assert_eq!(h.state(GroupKind::Heading), Some(PlaybackState::Playing));
    }
}

#[test]
fn test_replay_frames_are_identical() {
    let mut h = Harness::new();
    let node = NodeId(12);

    let sample = |h: &mut Harness| -> Vec<VisualProps> {
        h.scroll(400.0);
        (0..6)
            .map(|_| {
                h.tick(120.0);
                h.styles.style(node).unwrap()
            })
            .collect()
    };

    let first = sample(&mut h);
    h.scroll(0.0);
    let second = sample(&mut h);
    assert_eq!(first, second);
}

#[test]
fn test_hidden_before_entry_settled_after() {
    let mut h = Harness::new();
    h.tick(16.0);
    let hidden = h.styles.style(NodeId(11)).unwrap();
    assert_eq!(hidden.opacity, 0.0);
    assert_eq!(hidden.translate_y, 50.0);

    h.scroll(400.0);
    h.tick(5000.0);
    assert_eq!(h.styles.style(NodeId(11)), Some(VisualProps::IDENTITY));
    assert!(!h.engine.is_animating());
}

#[test]
fn test_counter_resets_to_zero_on_leave() {
    let mut h = Harness::new();
    h.tick(16.0);
    assert_eq!(h.styles.text(NodeId(15)), Some("0.0B"));

    // Still below the enter line at 400
    h.scroll(400.0);
    assert_eq!(h.styles.text(NodeId(15)), Some("0.0B"));

    h.scroll(900.0);
    h.tick(2500.0);
    assert_eq!(h.styles.text(NodeId(15)), Some("1.3B"));

    h.scroll(0.0);
    assert_eq!(h.engine.counter(NodeId(15)).unwrap().current(), 0.0);
    assert_eq!(h.styles.text(NodeId(15)), Some("0.0B"));
}

#[test]
fn test_ambient_layer_enters_at_center() {
    let mut h = Harness::new();
    // Layer top 2400; center line = scroll + 400
    h.scroll(1990.0);
    assert_eq!(
        h.engine.parallax().layer(NodeId(90)).unwrap().state(),
        PlaybackState::Idle
    );
    let events = h.scroll(2010.0);
    assert!(events.contains(&(NodeId(90), Boundary::Enter)));
}

#[test]
fn test_clean_teardown() {
    let mut h = Harness::new();
    h.scroll(400.0);
    h.tick(100.0);
    assert!(h.engine.is_animating());

    h.engine.unmount();
    assert_eq!(h.engine.mode(), EngineMode::TornDown);
    assert!(!h.engine.is_animating());
    assert!(h.engine.scheduler().is_empty());
    assert_eq!(h.engine.live_timelines(), 0);
    assert_ne!(h.state(GroupKind::Heading), Some(PlaybackState::Playing));

    assert!(h.scroll(0.0).is_empty());
    assert!(h.scroll(400.0).is_empty());
    h.engine.unmount();
}

#[test]
fn test_at_most_one_transition_per_group_per_frame() {
    let mut h = Harness::new();
    for y in [400.0, 0.0, 400.0, 1900.0, 400.0, 0.0] {
        let events = h.scroll(y);
        let features = events.iter().filter(|(r, _)| *r == NodeId(10)).count();
        assert!(features <= 1);
    }
}
