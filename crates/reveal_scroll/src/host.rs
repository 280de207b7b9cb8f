//! Host seam
//!
//! The engine never touches a document directly. Layout is read through a
//! [`LayoutProbe`] and computed styles are written to a [`StyleSink`].
//! [`StaticLayout`] and [`StyleLog`] are in-memory implementations used by
//! headless runs and tests.

use reveal_animation::VisualProps;
use reveal_core::{NodeId, Rect, Scene, Viewport};
use rustc_hash::FxHashMap;

/// Read-only view of the host's layout
pub trait LayoutProbe {
    /// Current viewport, or `None` when the host cannot observe layout
    fn viewport(&self) -> Option<Viewport>;

    /// Document bounds of a node, or `None` when it is not in the document
    fn bounds(&self, node: NodeId) -> Option<Rect>;
}

/// Receives computed styles each frame
pub trait StyleSink {
    fn apply(&mut self, node: NodeId, props: &VisualProps);

    /// Replace a node's text content (counters)
    fn set_text(&mut self, node: NodeId, text: &str);
}

/// Layout taken from the bounds authored in a scene
#[derive(Clone, Debug, Default)]
pub struct StaticLayout {
    viewport: Option<Viewport>,
    bounds: FxHashMap<NodeId, Rect>,
}

impl StaticLayout {
    pub fn new(viewport: Option<Viewport>) -> Self {
        Self {
            viewport,
            bounds: FxHashMap::default(),
        }
    }

    /// Collect every node's authored bounds
    pub fn from_scene(scene: &Scene, viewport: Option<Viewport>) -> Self {
        let bounds = scene
            .root
            .walk()
            .filter_map(|node| node.bounds.map(|b| (node.id, b)))
            .collect();
        Self { viewport, bounds }
    }

    pub fn with_bounds(mut self, node: NodeId, bounds: Rect) -> Self {
        self.bounds.insert(node, bounds);
        self
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    pub fn scroll_to(&mut self, scroll_y: f32) {
        if let Some(viewport) = &mut self.viewport {
            viewport.scroll_y = scroll_y;
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if let Some(viewport) = &mut self.viewport {
            *viewport = viewport.resized(width, height);
        }
    }

    pub fn remove(&mut self, node: NodeId) -> Option<Rect> {
        self.bounds.remove(&node)
    }
}

impl LayoutProbe for StaticLayout {
    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.bounds.get(&node).copied()
    }
}

/// Records the latest style and text written for every node
#[derive(Clone, Debug, Default)]
pub struct StyleLog {
    styles: FxHashMap<NodeId, VisualProps>,
    texts: FxHashMap<NodeId, String>,
    writes: u64,
}

impl StyleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, node: NodeId) -> Option<VisualProps> {
        self.styles.get(&node).copied()
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.texts.get(&node).map(String::as_str)
    }

    /// Total number of writes received
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn styles(&self) -> impl Iterator<Item = (NodeId, &VisualProps)> {
        self.styles.iter().map(|(id, props)| (*id, props))
    }

    pub fn texts(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.texts.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

impl StyleSink for StyleLog {
    fn apply(&mut self, node: NodeId, props: &VisualProps) {
        self.styles.insert(node, *props);
        self.writes += 1;
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.texts.insert(node, text.to_string());
        self.writes += 1;
    }
}
