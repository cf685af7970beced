use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::constants::placement::SUPPORT_TOLERANCE;
use crate::materials::{BuildType, ItemId, ToolType};

pub type EntityId = u32;

/// Inclusive quantity range for drops and loot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct YieldRange {
    pub min: u32,
    pub max: u32,
}

impl YieldRange {
    pub fn exactly(count: u32) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct YieldEntry {
    pub item: ItemId,
    pub range: YieldRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAmount {
    pub item: ItemId,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Intact,
    Damaged,
    Depleted,
}

/// Anything that is struck until it breaks: trees, rocks, animals.
#[derive(Debug, Clone, PartialEq)]
pub struct Harvestable {
    /// `None` means the first successful hit depletes it.
    pub health: Option<u32>,
    pub damage_taken: u32,
    pub required_tool: Option<ToolType>,
    pub yields: Vec<YieldEntry>,
    pub state: NodeState,
}

impl Harvestable {
    pub fn new(health: Option<u32>, required_tool: Option<ToolType>, yields: Vec<YieldEntry>) -> Self {
        Self {
            health,
            damage_taken: 0,
            required_tool,
            yields,
            state: NodeState::Intact,
        }
    }

    pub fn strike(&mut self, damage: u32) -> NodeState {
        self.state = match self.health {
            None => NodeState::Depleted,
            Some(health) => {
                self.damage_taken = self.damage_taken.saturating_add(damage);
                if self.damage_taken >= health {
                    NodeState::Depleted
                } else {
                    NodeState::Damaged
                }
            }
        };
        self.state
    }

    pub fn remaining_health(&self) -> u32 {
        self.health
            .map_or(0, |health| health.saturating_sub(self.damage_taken))
    }

    pub fn roll_yields(&self, rng: &mut impl Rng) -> Vec<ItemAmount> {
        self.yields
            .iter()
            .map(|entry| ItemAmount {
                item: entry.item.clone(),
                count: entry.range.roll(rng),
            })
            .filter(|amount| amount.count > 0)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Unsearched,
    Searched,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpec {
    pub offset: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedStructure {
    pub item_id: ItemId,
    pub build_type: BuildType,
    pub rotation: Quat,
    pub size: Vec3,
    pub light: Option<LightSpec>,
}

impl PlacedStructure {
    /// World-space half extents. Only quarter turns about y are produced by
    /// placement, so a turned piece just swaps its x and z extents.
    pub fn half_extents(&self) -> Vec3 {
        let turned = self.rotation * Vec3::X;
        let half = self.size / 2.0;
        if turned.z.abs() > turned.x.abs() {
            Vec3::new(half.z, half.y, half.x)
        } else {
            half
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    ResourceNode {
        name: String,
        node: Harvestable,
    },
    Creature {
        species: String,
        body: Harvestable,
    },
    Container {
        container_type: String,
        loot: Vec<ItemAmount>,
        state: ContainerState,
        ephemeral: bool,
    },
    PlacedStructure(PlacedStructure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldEntity {
    pub id: EntityId,
    pub position: Vec3,
    /// Hit radius for spherical interactables. Placed structures use their box.
    pub radius: f32,
    pub kind: EntityKind,
}

impl WorldEntity {
    pub fn label(&self) -> &str {
        match &self.kind {
            EntityKind::ResourceNode { name, .. } => name,
            EntityKind::Creature { species, .. } => species,
            EntityKind::Container { container_type, .. } => container_type,
            EntityKind::PlacedStructure(structure) => &structure.item_id,
        }
    }

    pub fn is_interactable(&self) -> bool {
        !matches!(self.kind, EntityKind::PlacedStructure(_))
    }

    pub fn half_extents(&self) -> Vec3 {
        match &self.kind {
            EntityKind::PlacedStructure(structure) => structure.half_extents(),
            _ => Vec3::splat(self.radius),
        }
    }

    pub fn aabb(&self) -> Aabb3d {
        Aabb3d::new(self.position, self.half_extents())
    }

    /// Distance along the ray to this entity's bounds, if it is hit within the cast.
    pub fn hit_distance(&self, cast: &RayCast3d) -> Option<f32> {
        match &self.kind {
            EntityKind::PlacedStructure(_) => cast.aabb_intersection_at(&self.aabb()),
            _ => cast.sphere_intersection_at(&BoundingSphere::new(self.position, self.radius)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportInfo {
    pub entity: EntityId,
    pub build_type: BuildType,
    pub top_height: f32,
}

/// Every resource node, creature, container and placed structure in the
/// world, with the index sets ray queries run against.
#[derive(Resource, Debug, Default)]
pub struct WorldRegistry {
    entities: HashMap<EntityId, WorldEntity>,
    interactable: BTreeSet<EntityId>,
    collidable: BTreeSet<EntityId>,
    next_id: EntityId,
    pending_removals: Vec<EntityId>,
}

impl WorldRegistry {
    pub fn spawn(&mut self, position: Vec3, radius: f32, kind: EntityKind) -> EntityId {
        self.next_id += 1;
        let id = self.next_id;
        let entity = WorldEntity {
            id,
            position,
            radius,
            kind,
        };
        if entity.is_interactable() {
            self.interactable.insert(id);
        }
        self.collidable.insert(id);
        debug!(id, label = entity.label(), ?position, "spawned world entity");
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity from the registry and every index, queueing a
    /// removal notice for the render side.
    pub fn remove(&mut self, id: EntityId) -> Option<WorldEntity> {
        let entity = self.entities.remove(&id)?;
        self.interactable.remove(&id);
        self.collidable.remove(&id);
        self.pending_removals.push(id);
        debug!(id, label = entity.label(), "removed world entity");
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut WorldEntity> {
        self.entities.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_interactable(&self, id: EntityId) -> bool {
        self.interactable.contains(&id)
    }

    pub fn is_collidable(&self, id: EntityId) -> bool {
        self.collidable.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldEntity> {
        self.entities.values()
    }

    pub fn placed_structures(&self) -> impl Iterator<Item = (&WorldEntity, &PlacedStructure)> {
        self.entities.values().filter_map(|entity| match &entity.kind {
            EntityKind::PlacedStructure(structure) => Some((entity, structure)),
            _ => None,
        })
    }

    pub fn drain_removals(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending_removals)
    }

    pub fn has_pending_removals(&self) -> bool {
        !self.pending_removals.is_empty()
    }

    /// Nearest interactable hit by the ray within `max_distance`.
    pub fn cast_interactables(&self, ray: Ray3d, max_distance: f32) -> Option<(EntityId, f32)> {
        let cast = RayCast3d::from_ray(ray, max_distance);
        self.interactable
            .iter()
            .filter_map(|id| {
                let distance = self.entities.get(id)?.hit_distance(&cast)?;
                Some((*id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Nearest placed structure hit by the ray within `max_distance`.
    pub fn cast_structures(&self, ray: Ray3d, max_distance: f32) -> Option<(EntityId, f32)> {
        let cast = RayCast3d::from_ray(ray, max_distance);
        self.placed_structures()
            .filter(|(entity, _)| self.collidable.contains(&entity.id))
            .filter_map(|(entity, _)| Some((entity.id, entity.hit_distance(&cast)?)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// The highest placed structure whose box contains `point`, within a
    /// small tolerance.
    pub fn supporting_structure(&self, point: Vec3) -> Option<SupportInfo> {
        self.placed_structures()
            .filter_map(|(entity, structure)| {
                let half = structure.half_extents() + Vec3::splat(SUPPORT_TOLERANCE);
                let offset = (point - entity.position).abs();
                (offset.cmple(half).all()).then(|| SupportInfo {
                    entity: entity.id,
                    build_type: structure.build_type,
                    top_height: entity.position.y + structure.size.y / 2.0,
                })
            })
            .max_by(|a, b| a.top_height.total_cmp(&b.top_height))
    }

    /// Ids found in an index without a matching entity, or interactable
    /// entities that are already depleted or searched-and-ephemeral.
    pub fn index_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for id in self.interactable.iter().chain(self.collidable.iter()) {
            if !self.entities.contains_key(id) {
                violations.push(format!("index refers to missing entity {id}"));
            }
        }
        for id in &self.interactable {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            match &entity.kind {
                EntityKind::ResourceNode { node: h, .. } | EntityKind::Creature { body: h, .. }
                    if h.state == NodeState::Depleted =>
                {
                    violations.push(format!("depleted entity {id} is still interactable"));
                }
                EntityKind::Container {
                    state: ContainerState::Searched,
                    ephemeral: true,
                    ..
                } => {
                    violations.push(format!("searched ephemeral container {id} still exists"));
                }
                EntityKind::PlacedStructure(_) => {
                    violations.push(format!("placed structure {id} is indexed as interactable"));
                }
                _ => {}
            }
        }
        violations
    }
}
