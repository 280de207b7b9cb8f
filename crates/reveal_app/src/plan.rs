//! Dry-run view of what a scene would animate.

use anyhow::{Context, Result};
use reveal_animation::DefinitionSummary;
use reveal_core::{NodeId, Scene};
use reveal_scroll::{AmbientLayer, CounterNode, EngineConfig, SectionScanner};
use serde::Serialize;

/// Sections, group definitions, ambient layers and counters of a scene.
#[derive(Debug, Clone, Serialize)]
pub struct ScenePlan {
    pub sections: Vec<SectionPlan>,
    pub ambient: Vec<AmbientLayer>,
    pub counters: Vec<CounterNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionPlan {
    pub name: String,
    pub root: NodeId,
    pub index: usize,
    pub groups: Vec<DefinitionSummary>,
}

impl ScenePlan {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Scan `scene` and build every group definition without mounting.
pub fn plan_scenario(scene: &Scene, config: &EngineConfig) -> Result<ScenePlan> {
    scene.validate().context("invalid scene")?;
    config.validate().context("invalid engine configuration")?;

    let scan = SectionScanner::scan(scene);
    let factory = config.factory();
    let sections = scan
        .sections
        .into_iter()
        .map(|section| SectionPlan {
            groups: section
                .groups
                .iter()
                .map(|group| {
                    factory
                        .build(group.kind, &group.elements, section.index)
                        .summary()
                })
                .collect(),
            name: section.name,
            root: section.root,
            index: section.index,
        })
        .collect();

    Ok(ScenePlan {
        sections,
        ambient: scan.ambient,
        counters: scan.counters,
    })
}
