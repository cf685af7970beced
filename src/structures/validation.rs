use bevy::prelude::*;

use crate::config::SandboxConfig;
use crate::materials::{InventoryStore, ItemCatalog, ItemId};
use crate::world::{
    AimState, EntityId, EntityKind, LightSpec, PlacedStructure, SceneSurfaces, Terrain,
    WorldRegistry,
};

use super::placement::{plan, PlaceRequest, PlacementPose, PlacementRules};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("Nothing selected")]
    NothingSelected,
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("{0} can't be placed")]
    NotPlaceable(ItemId),
    #[error("Nothing to build on")]
    NoSurface,
    #[error("Too far away")]
    OutOfReach,
    #[error("No {0} left")]
    NotInInventory(ItemId),
}

#[derive(Message, Debug, Clone)]
pub struct PlacementValidationEvent {
    pub item_id: Option<ItemId>,
    pub result: Result<PlacementPose, PlacementError>,
}

#[derive(Message, Debug, Clone)]
pub struct PlacementResultEvent {
    pub item_id: Option<ItemId>,
    pub result: Result<EntityId, PlacementError>,
}

/// Debits one of `item_id` and adds the structure to the world at `pose`.
///
/// Everything is checked again before anything changes, since the
/// inventory or aim may have moved on since the pose was planned.
pub fn commit(
    pose: &PlacementPose,
    item_id: &str,
    inventory: &mut InventoryStore,
    world: &mut WorldRegistry,
    rules: &PlacementRules,
) -> Result<EntityId, PlacementError> {
    let definition = inventory
        .catalog()
        .get(item_id)
        .map_err(|_| PlacementError::UnknownItem(item_id.to_string()))?
        .clone();
    let Some(build_type) = definition.build_type else {
        return Err(PlacementError::NotPlaceable(item_id.to_string()));
    };
    if pose.distance > rules.reach {
        return Err(PlacementError::OutOfReach);
    }
    if inventory.remove(item_id, 1).is_err() {
        return Err(PlacementError::NotInInventory(item_id.to_string()));
    }

    let size = definition.footprint();
    let light = definition.light.map(|light| LightSpec {
        offset: Vec3::Y * size.y * light.height_factor,
        intensity: light.intensity,
        range: light.range,
        color: Color::srgb(light.color.0, light.color.1, light.color.2),
    });
    let id = world.spawn(
        pose.position,
        0.0,
        EntityKind::PlacedStructure(PlacedStructure {
            item_id: item_id.to_string(),
            build_type,
            rotation: pose.rotation,
            size,
            light,
        }),
    );
    info!(item = %item_id, id, position = ?pose.position, "placed structure");
    Ok(id)
}

pub fn validate_placement(
    mut requests: MessageReader<PlaceRequest>,
    mut validation_events: MessageWriter<PlacementValidationEvent>,
    aim: Res<AimState>,
    inventory: Res<InventoryStore>,
    catalog: Res<ItemCatalog>,
    terrain: Res<Terrain>,
    world: Res<WorldRegistry>,
    config: Res<SandboxConfig>,
) {
    let rules = PlacementRules::from(&*config);
    for _ in requests.read() {
        let Some(stack) = inventory.selected_item() else {
            validation_events.write(PlacementValidationEvent {
                item_id: None,
                result: Err(PlacementError::NothingSelected),
            });
            continue;
        };
        let item_id = stack.item_id.clone();

        let result = match catalog.get(&item_id) {
            Err(_) => Err(PlacementError::UnknownItem(item_id.clone())),
            Ok(def) if !def.placeable() => Err(PlacementError::NotPlaceable(item_id.clone())),
            Ok(def) => match aim.ray() {
                Err(err) => {
                    error!(%err, "placement skipped");
                    Err(PlacementError::NoSurface)
                }
                Ok(ray) => {
                    let surfaces = SceneSurfaces {
                        terrain: &terrain,
                        world: &world,
                    };
                    plan(ray, def, &surfaces, &rules).ok_or(PlacementError::NoSurface)
                }
            },
        };
        validation_events.write(PlacementValidationEvent {
            item_id: Some(item_id),
            result,
        });
    }
}

pub fn place_structure(
    mut validation_events: MessageReader<PlacementValidationEvent>,
    mut results: MessageWriter<PlacementResultEvent>,
    mut inventory: ResMut<InventoryStore>,
    mut world: ResMut<WorldRegistry>,
    config: Res<SandboxConfig>,
) {
    let rules = PlacementRules::from(&*config);
    for event in validation_events.read() {
        let result = match (&event.result, &event.item_id) {
            (Ok(pose), Some(item_id)) => commit(pose, item_id, &mut inventory, &mut world, &rules),
            (Ok(_), None) => Err(PlacementError::NothingSelected),
            (Err(err), _) => Err(err.clone()),
        };
        if let Err(err) = &result {
            debug!(item = ?event.item_id, %err, "placement refused");
        }
        results.write(PlacementResultEvent {
            item_id: event.item_id.clone(),
            result,
        });
    }
}
