use bevy::math::InvalidDirectionError;
use bevy::prelude::*;
use rand::Rng;

use crate::config::SandboxConfig;
use crate::materials::{InventoryError, InventoryStore, ItemCatalog, ItemDefinition, ToolType};
use crate::world::entities::{
    ContainerState, EntityId, EntityKind, Harvestable, ItemAmount, NodeState, WorldRegistry,
};

#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("aim ray is unusable: {0}")]
    ResolverFault(#[from] InvalidDirectionError),
}

/// Where the player is looking, written by the camera each frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct AimState {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 1.7, 0.0),
            direction: Vec3::NEG_Z,
        }
    }
}

impl AimState {
    pub fn looking_at(origin: Vec3, target: Vec3) -> Self {
        Self {
            origin,
            direction: target - origin,
        }
    }

    pub fn ray(&self) -> Result<Ray3d, InteractionError> {
        let direction = Dir3::new(self.direction)?;
        Ok(Ray3d::new(self.origin, direction))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRules {
    pub reach: f32,
    pub harvest_damage: u32,
    pub unarmed_damage: u32,
}

impl From<&SandboxConfig> for InteractionRules {
    fn from(config: &SandboxConfig) -> Self {
        Self {
            reach: config.interaction_reach,
            harvest_damage: config.harvest_damage,
            unarmed_damage: config.unarmed_damage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    NoTarget,
    ToolMismatch {
        entity: EntityId,
        required: ToolType,
    },
    Damaged {
        entity: EntityId,
        remaining: u32,
    },
    Depleted {
        entity: EntityId,
        gathered: Vec<ItemAmount>,
        overflow: Vec<ItemAmount>,
    },
    Looted {
        entity: EntityId,
        gathered: Vec<ItemAmount>,
        overflow: Vec<ItemAmount>,
    },
    AlreadySearched {
        entity: EntityId,
    },
    Inert {
        entity: EntityId,
    },
}

impl InteractionOutcome {
    /// Short player-facing text, or `None` when nothing worth saying happened.
    pub fn feedback(&self, catalog: &ItemCatalog) -> Option<String> {
        match self {
            InteractionOutcome::NoTarget
            | InteractionOutcome::Inert { .. }
            | InteractionOutcome::Damaged { .. } => None,
            InteractionOutcome::ToolMismatch { required, .. } => {
                Some(format!("Requires {required}"))
            }
            InteractionOutcome::AlreadySearched { .. } => Some("Already searched".to_string()),
            InteractionOutcome::Depleted {
                gathered, overflow, ..
            }
            | InteractionOutcome::Looted {
                gathered, overflow, ..
            } => {
                if gathered.is_empty() && !overflow.is_empty() {
                    return Some("Inventory full".to_string());
                }
                if gathered.is_empty() {
                    return Some("Found nothing".to_string());
                }
                let parts: Vec<String> = gathered
                    .iter()
                    .map(|amount| format!("+{} {}", amount.count, catalog.display_name(&amount.item)))
                    .collect();
                Some(parts.join(", "))
            }
        }
    }
}

enum Effect {
    Mismatch(ToolType),
    Damaged(u32),
    Depleted(Vec<ItemAmount>),
    Looted { items: Vec<ItemAmount>, ephemeral: bool },
    AlreadySearched,
    Inert,
}

fn strike(
    target: &mut Harvestable,
    held: Option<&ItemDefinition>,
    damage: u32,
    rng: &mut impl Rng,
) -> Effect {
    if let Some(required) = target.required_tool {
        if held.and_then(|def| def.tool_type) != Some(required) {
            return Effect::Mismatch(required);
        }
    }
    match target.strike(damage) {
        NodeState::Depleted => Effect::Depleted(target.roll_yields(rng)),
        _ => Effect::Damaged(target.remaining_health()),
    }
}

/// Applies the held item to whatever interactable the aim ray hits first
/// within reach.
///
/// Resource nodes and creatures take damage and, once depleted, drop their
/// yields into the inventory and leave the world. Containers hand over their
/// loot once. Items that do not fit are reported as overflow and discarded.
pub fn resolve(
    world: &mut WorldRegistry,
    inventory: &mut InventoryStore,
    aim: &AimState,
    held: Option<&ItemDefinition>,
    rules: &InteractionRules,
    rng: &mut impl Rng,
) -> InteractionOutcome {
    let ray = match aim.ray() {
        Ok(ray) => ray,
        Err(err) => {
            error!(%err, "interaction skipped");
            return InteractionOutcome::NoTarget;
        }
    };
    let Some((entity_id, distance)) = world.cast_interactables(ray, rules.reach) else {
        return InteractionOutcome::NoTarget;
    };
    let Some(entity) = world.get_mut(entity_id) else {
        return InteractionOutcome::NoTarget;
    };

    let effect = match &mut entity.kind {
        EntityKind::ResourceNode { node, .. } => strike(node, held, rules.harvest_damage, rng),
        EntityKind::Creature { body, .. } => {
            let damage = held
                .and_then(|def| def.attack_damage)
                .unwrap_or(rules.unarmed_damage);
            strike(body, held, damage, rng)
        }
        EntityKind::Container {
            loot,
            state,
            ephemeral,
            ..
        } => match *state {
            ContainerState::Searched => Effect::AlreadySearched,
            ContainerState::Unsearched => {
                *state = ContainerState::Searched;
                Effect::Looted {
                    items: std::mem::take(loot),
                    ephemeral: *ephemeral,
                }
            }
        },
        EntityKind::PlacedStructure(_) => Effect::Inert,
    };
    debug!(entity = entity_id, distance, label = entity.label(), "interaction target");

    match effect {
        Effect::Mismatch(required) => InteractionOutcome::ToolMismatch {
            entity: entity_id,
            required,
        },
        Effect::Damaged(remaining) => InteractionOutcome::Damaged {
            entity: entity_id,
            remaining,
        },
        Effect::Depleted(drops) => {
            world.remove(entity_id);
            let (gathered, overflow) = deposit(inventory, drops);
            info!(entity = entity_id, ?gathered, "harvested");
            InteractionOutcome::Depleted {
                entity: entity_id,
                gathered,
                overflow,
            }
        }
        Effect::Looted { items, ephemeral } => {
            if ephemeral {
                world.remove(entity_id);
            }
            let (gathered, overflow) = deposit(inventory, items);
            info!(entity = entity_id, ?gathered, "looted container");
            InteractionOutcome::Looted {
                entity: entity_id,
                gathered,
                overflow,
            }
        }
        Effect::AlreadySearched => InteractionOutcome::AlreadySearched { entity: entity_id },
        Effect::Inert => InteractionOutcome::Inert { entity: entity_id },
    }
}

/// Adds each drop, splitting what fit from what did not.
fn deposit(
    inventory: &mut InventoryStore,
    drops: Vec<ItemAmount>,
) -> (Vec<ItemAmount>, Vec<ItemAmount>) {
    let mut gathered = Vec::new();
    let mut overflow = Vec::new();
    for drop in drops {
        match inventory.add(&drop.item, drop.count) {
            Ok(added) => {
                if added > 0 {
                    gathered.push(ItemAmount {
                        item: drop.item.clone(),
                        count: added,
                    });
                }
                if added < drop.count {
                    warn!(item = %drop.item, lost = drop.count - added, "inventory full, drop discarded");
                    overflow.push(ItemAmount {
                        item: drop.item,
                        count: drop.count - added,
                    });
                }
            }
            Err(InventoryError::UnknownItem(item)) => {
                warn!(item = %item, "skipping drop of unknown item");
            }
            Err(err) => warn!(%err, "drop rejected"),
        }
    }
    (gathered, overflow)
}
