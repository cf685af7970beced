use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::materials::{ItemCatalog, ToolType};
use crate::world::entities::{
    ContainerState, EntityId, EntityKind, Harvestable, ItemAmount, WorldRegistry, YieldEntry,
    YieldRange,
};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to parse world templates: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("template '{template}' drops unknown item '{item}'")]
    UnknownItem { template: String, item: String },
    #[error("no {kind} template named '{name}'")]
    Missing { kind: &'static str, name: String },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NodeTemplate {
    pub name: String,
    pub radius: f32,
    pub health: Option<u32>,
    pub required_tool: Option<ToolType>,
    pub yields: Vec<YieldEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreatureTemplate {
    pub species: String,
    pub radius: f32,
    pub health: u32,
    pub required_tool: Option<ToolType>,
    pub drops: Vec<YieldEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContainerTemplate {
    pub container_type: String,
    pub radius: f32,
    /// How many draws are taken from the pool when the container spawns.
    pub rolls: YieldRange,
    pub loot_pool: Vec<YieldEntry>,
    #[serde(default)]
    pub ephemeral: bool,
}

/// Spawnable kinds of resource nodes, creatures and containers.
#[derive(Resource, Serialize, Deserialize, Debug, Clone, Default)]
pub struct WorldTemplates {
    pub resource_nodes: Vec<NodeTemplate>,
    pub creatures: Vec<CreatureTemplate>,
    pub containers: Vec<ContainerTemplate>,
}

impl WorldTemplates {
    pub fn from_ron(ron_content: &str) -> Result<Self, TemplateError> {
        Ok(ron::from_str(ron_content)?)
    }

    pub fn load_from_assets() -> Result<Self, TemplateError> {
        let ron_content = include_str!("../assets/world.ron");
        Self::from_ron(ron_content)
    }

    /// Checks that every drop and loot entry names a catalog item.
    pub fn validate(&self, catalog: &ItemCatalog) -> Result<(), TemplateError> {
        let entries = self
            .resource_nodes
            .iter()
            .flat_map(|t| t.yields.iter().map(move |e| (&t.name, e)))
            .chain(
                self.creatures
                    .iter()
                    .flat_map(|t| t.drops.iter().map(move |e| (&t.species, e))),
            )
            .chain(
                self.containers
                    .iter()
                    .flat_map(|t| t.loot_pool.iter().map(move |e| (&t.container_type, e))),
            );
        for (template, entry) in entries {
            if !catalog.contains(&entry.item) {
                return Err(TemplateError::UnknownItem {
                    template: template.clone(),
                    item: entry.item.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn node(&self, name: &str) -> Result<&NodeTemplate, TemplateError> {
        self.resource_nodes
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| TemplateError::Missing {
                kind: "resource node",
                name: name.to_string(),
            })
    }

    pub fn creature(&self, species: &str) -> Result<&CreatureTemplate, TemplateError> {
        self.creatures
            .iter()
            .find(|t| t.species == species)
            .ok_or_else(|| TemplateError::Missing {
                kind: "creature",
                name: species.to_string(),
            })
    }

    pub fn container(&self, container_type: &str) -> Result<&ContainerTemplate, TemplateError> {
        self.containers
            .iter()
            .find(|t| t.container_type == container_type)
            .ok_or_else(|| TemplateError::Missing {
                kind: "container",
                name: container_type.to_string(),
            })
    }
}

impl WorldRegistry {
    pub fn spawn_node(&mut self, template: &NodeTemplate, position: Vec3) -> EntityId {
        self.spawn(
            position,
            template.radius,
            EntityKind::ResourceNode {
                name: template.name.clone(),
                node: Harvestable::new(
                    template.health,
                    template.required_tool,
                    template.yields.clone(),
                ),
            },
        )
    }

    pub fn spawn_creature(&mut self, template: &CreatureTemplate, position: Vec3) -> EntityId {
        self.spawn(
            position,
            template.radius,
            EntityKind::Creature {
                species: template.species.clone(),
                body: Harvestable::new(
                    Some(template.health),
                    template.required_tool,
                    template.drops.clone(),
                ),
            },
        )
    }

    /// Spawns a container with its loot rolled up front.
    pub fn spawn_container(
        &mut self,
        template: &ContainerTemplate,
        position: Vec3,
        rng: &mut impl Rng,
    ) -> EntityId {
        let mut loot: Vec<ItemAmount> = Vec::new();
        for _ in 0..template.rolls.roll(rng) {
            let Some(entry) = template.loot_pool.choose(rng) else {
                break;
            };
            let count = entry.range.roll(rng);
            if count == 0 {
                continue;
            }
            match loot.iter_mut().find(|amount| amount.item == entry.item) {
                Some(existing) => existing.count += count,
                None => loot.push(ItemAmount {
                    item: entry.item.clone(),
                    count,
                }),
            }
        }
        self.spawn_container_with(template, position, loot)
    }

    pub fn spawn_container_with(
        &mut self,
        template: &ContainerTemplate,
        position: Vec3,
        loot: Vec<ItemAmount>,
    ) -> EntityId {
        self.spawn(
            position,
            template.radius,
            EntityKind::Container {
                container_type: template.container_type.clone(),
                loot,
                state: ContainerState::Unsearched,
                ephemeral: template.ephemeral,
            },
        )
    }
}
