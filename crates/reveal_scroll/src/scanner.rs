//! Section scanner
//!
//! Walks the host's scene graph once at mount and classifies tagged nodes:
//!
//! - every `Section` node opens a section; nested sections own their own
//!   descendants
//! - tagged descendants of a section join the section's group for their kind
//! - a `Card` is animated as one unit, so nothing inside it joins a group
//!   (counters inside cards are still discovered)
//! - `Parallax` nodes outside any section become ambient layers
//! - `Counter` nodes are collected wherever they appear

use reveal_core::{GroupKind, NodeId, NodeRole, Scene, SceneNode};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// One animation group inside a section
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScannedGroup {
    pub kind: GroupKind,
    /// Elements in document order
    pub elements: SmallVec<[NodeId; 4]>,
}

/// A tagged section and its non-empty groups
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScannedSection {
    pub root: NodeId,
    pub name: String,
    /// Document-order index among all sections
    pub index: usize,
    /// Non-empty groups, ordered by [`GroupKind::ALL`]
    pub groups: Vec<ScannedGroup>,
}

impl ScannedSection {
    pub fn group(&self, kind: GroupKind) -> Option<&ScannedGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }
}

/// Decorative layer outside every section
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AmbientLayer {
    pub node: NodeId,
    pub speed: f32,
}

/// Numeric counter node and its authored value
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CounterNode {
    pub node: NodeId,
    pub value: String,
}

/// Everything the scanner found
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScanResult {
    pub sections: Vec<ScannedSection>,
    pub ambient: Vec<AmbientLayer>,
    pub counters: Vec<CounterNode>,
}

impl ScanResult {
    pub fn section(&self, name: &str) -> Option<&ScannedSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Total number of grouped elements across all sections
    pub fn element_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.groups.iter())
            .map(|g| g.elements.len())
            .sum()
    }
}

type Buckets = [SmallVec<[NodeId; 4]>; GroupKind::ALL.len()];

fn bucket_index(kind: GroupKind) -> usize {
    GroupKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default()
}

/// Classifies a scene into sections, groups, ambient layers and counters
#[derive(Default)]
pub struct SectionScanner {
    sections: Vec<(NodeId, String, Buckets)>,
    ambient: Vec<AmbientLayer>,
    counters: Vec<CounterNode>,
}

impl SectionScanner {
    pub fn scan(scene: &Scene) -> ScanResult {
        let mut scanner = SectionScanner::default();
        scanner.visit(&scene.root, None, false);
        let result = scanner.finish();
        debug!(
            sections = result.sections.len(),
            elements = result.element_count(),
            ambient = result.ambient.len(),
            counters = result.counters.len(),
            "scanned scene"
        );
        result
    }

    fn visit(&mut self, node: &SceneNode, section: Option<usize>, in_card: bool) {
        match &node.role {
            NodeRole::Counter { value } => {
                self.counters.push(CounterNode {
                    node: node.id,
                    value: value.clone(),
                });
                return;
            }
            _ if in_card => {}
            NodeRole::Section { name } => {
                let index = self.sections.len();
                self.sections
                    .push((node.id, name.clone(), Default::default()));
                for child in &node.children {
                    self.visit(child, Some(index), false);
                }
                return;
            }
            NodeRole::Parallax { speed } if section.is_none() => {
                self.ambient.push(AmbientLayer {
                    node: node.id,
                    speed: *speed,
                });
            }
            role => {
                if let Some(kind) = GroupKind::from_role(role) {
                    match section {
                        Some(index) => self.sections[index].2[bucket_index(kind)].push(node.id),
                        None => trace!(node = %node.id, %kind, "tagged node outside any section"),
                    }
                }
            }
        }

        let in_card = in_card || matches!(node.role, NodeRole::Card);
        for child in &node.children {
            self.visit(child, section, in_card);
        }
    }

    fn finish(self) -> ScanResult {
        let sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(index, (root, name, buckets))| {
                let groups = GroupKind::ALL
                    .into_iter()
                    .zip(buckets)
                    .filter(|(_, elements)| !elements.is_empty())
                    .map(|(kind, elements)| ScannedGroup { kind, elements })
                    .collect();
                ScannedSection {
                    root,
                    name,
                    index,
                    groups,
                }
            })
            .collect();

        ScanResult {
            sections,
            ambient: self.ambient,
            counters: self.counters,
        }
    }
}
