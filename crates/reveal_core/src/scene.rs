//! Scene graph input
//!
//! The host describes its page as a tree of [`SceneNode`]s. Every node carries
//! an explicit [`NodeRole`] tag, so the engine never has to infer structure
//! from markup or query global document state.
//!
//! ```rust
//! use reveal_core::scene::{NodeId, NodeRole, Scene, SceneNode};
//!
//! let scene = Scene::new(
//!     SceneNode::new(0, NodeRole::Container).child(
//!         SceneNode::new(1, NodeRole::section("hero"))
//!             .child(SceneNode::new(2, NodeRole::heading(1)))
//!             .child(SceneNode::new(3, NodeRole::Paragraph)),
//!     ),
//! );
//!
//! assert!(scene.validate().is_ok());
//! assert_eq!(scene.find(NodeId(3)).map(|n| n.id), Some(NodeId(3)));
//! ```

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RevealError};
use crate::geometry::Rect;

/// Stable identifier of a scene node, assigned by the host
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

fn default_heading_level() -> u8 {
    1
}

fn default_parallax_speed() -> f32 {
    0.2
}

/// Structural role of a scene node
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeRole {
    /// Plain structural wrapper; its children are still scanned
    #[default]
    Container,
    /// Explicitly tagged page section
    Section { name: String },
    /// Heading-level text
    Heading {
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    /// Paragraph text
    Paragraph,
    /// Interactive control (button, link, input)
    Control,
    /// Image, video or other media
    Media,
    /// Composite card container, animated as one unit
    Card,
    /// Element that slides horizontally as its section shifts in
    SectionShift,
    /// Decorative layer moved by scroll
    Parallax {
        #[serde(default = "default_parallax_speed")]
        speed: f32,
    },
    /// Numeric counter such as "1.3B" or "250+"
    Counter { value: String },
}

impl NodeRole {
    pub fn section(name: impl Into<String>) -> Self {
        NodeRole::Section { name: name.into() }
    }

    pub fn heading(level: u8) -> Self {
        NodeRole::Heading { level }
    }

    pub fn parallax(speed: f32) -> Self {
        NodeRole::Parallax { speed }
    }

    pub fn counter(value: impl Into<String>) -> Self {
        NodeRole::Counter {
            value: value.into(),
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, NodeRole::Section { .. })
    }
}

/// Animation group a classified element belongs to
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    Heading,
    Paragraph,
    Control,
    Media,
    Card,
    SectionShift,
    Parallax,
}

impl GroupKind {
    /// Every kind, in the order groups are laid out within a section
    pub const ALL: [GroupKind; 7] = [
        GroupKind::Heading,
        GroupKind::Paragraph,
        GroupKind::Control,
        GroupKind::Media,
        GroupKind::Card,
        GroupKind::SectionShift,
        GroupKind::Parallax,
    ];

    /// Group an element with this role is classified into
    pub fn from_role(role: &NodeRole) -> Option<GroupKind> {
        match role {
            NodeRole::Heading { .. } => Some(GroupKind::Heading),
            NodeRole::Paragraph => Some(GroupKind::Paragraph),
            NodeRole::Control => Some(GroupKind::Control),
            NodeRole::Media => Some(GroupKind::Media),
            NodeRole::Card => Some(GroupKind::Card),
            NodeRole::SectionShift => Some(GroupKind::SectionShift),
            NodeRole::Parallax { .. } => Some(GroupKind::Parallax),
            NodeRole::Container | NodeRole::Section { .. } | NodeRole::Counter { .. } => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Heading => "heading",
            GroupKind::Paragraph => "paragraph",
            GroupKind::Control => "control",
            GroupKind::Media => "media",
            GroupKind::Card => "card",
            GroupKind::SectionShift => "section_shift",
            GroupKind::Parallax => "parallax",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the host's scene graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    #[serde(default)]
    pub role: NodeRole,
    /// Static document bounds, used by hosts without live layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(id: u64, role: NodeRole) -> Self {
        Self {
            id: NodeId(id),
            role,
            bounds: None,
            children: Vec::new(),
        }
    }

    /// Builder: append a child
    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append several children
    pub fn children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Builder: set static bounds
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Pre-order (document order) traversal including `self`
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator over a scene subtree
pub struct Walk<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Root of the host-supplied scene graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub root: SceneNode,
}

impl Scene {
    pub fn new(root: SceneNode) -> Self {
        Self { root }
    }

    /// Check that every node id is unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        for node in self.root.walk() {
            if !seen.insert(node.id) {
                return Err(RevealError::DuplicateNode(node.id));
            }
        }
        Ok(())
    }

    /// Find a node by id
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.root.walk().find(|node| node.id == id)
    }

    /// Number of nodes in the scene
    pub fn len(&self) -> usize {
        self.root.walk().count()
    }

    /// A scene always has at least its root
    pub fn is_empty(&self) -> bool {
        false
    }
}
