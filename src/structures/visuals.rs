use bevy::prelude::*;
use std::collections::HashMap;

use crate::materials::{BuildType, ItemCatalog, ItemId};
use crate::world::{EntityId, EntityKind, WorldEntityRemoved, WorldRegistry};

use super::validation::PlacementResultEvent;

/// Links a render entity back to the world entity it draws.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldEntityVisual(pub EntityId);

#[derive(Debug, Clone)]
pub struct VisualHandles {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Mesh and material per item id, filled in by the host once its assets are
/// ready. Items without an entry still get a transform so lights and
/// children have somewhere to live.
#[derive(Resource, Debug, Clone, Default)]
pub struct ItemVisuals {
    handles: HashMap<ItemId, VisualHandles>,
}

impl ItemVisuals {
    pub fn insert(&mut self, item_id: impl Into<ItemId>, handles: VisualHandles) {
        self.handles.insert(item_id.into(), handles);
    }

    pub fn get(&self, item_id: &str) -> Option<&VisualHandles> {
        self.handles.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Plain boxes sized to each placeable item's footprint, tinted by what
    /// kind of piece it is. Good enough until real models are loaded.
    pub fn from_footprints(
        catalog: &ItemCatalog,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let mut visuals = Self::default();
        for definition in catalog.placeable_items() {
            let Some(build_type) = definition.build_type else {
                continue;
            };
            let size = definition.footprint();
            visuals.insert(
                definition.id.clone(),
                VisualHandles {
                    mesh: meshes.add(Cuboid::new(size.x, size.y, size.z)),
                    material: materials.add(tint(build_type)),
                },
            );
        }
        visuals
    }
}

fn tint(build_type: BuildType) -> Color {
    match build_type {
        BuildType::Foundation => Color::srgb(0.55, 0.55, 0.55),
        BuildType::Wall => Color::srgb(0.67, 0.67, 0.67),
        BuildType::Door => Color::srgb(0.45, 0.3, 0.15),
        BuildType::Roof => Color::srgb(0.4, 0.25, 0.2),
        BuildType::ResourceBlock => Color::srgb(0.6, 0.45, 0.25),
        BuildType::Utility => Color::srgb(0.35, 0.3, 0.25),
    }
}

pub fn spawn_structure_visuals(
    mut commands: Commands,
    mut results: MessageReader<PlacementResultEvent>,
    world: Res<WorldRegistry>,
    visuals: Res<ItemVisuals>,
) {
    for event in results.read() {
        let Ok(id) = event.result else {
            continue;
        };
        let Some(entity) = world.get(id) else {
            warn!(id, "placed structure vanished before it could be drawn");
            continue;
        };
        let EntityKind::PlacedStructure(structure) = &entity.kind else {
            continue;
        };

        let mut visual = commands.spawn((
            WorldEntityVisual(id),
            Name::new(structure.item_id.clone()),
            Transform::from_translation(entity.position).with_rotation(structure.rotation),
            Visibility::default(),
        ));
        if let Some(handles) = visuals.get(&structure.item_id) {
            visual.insert((
                Mesh3d(handles.mesh.clone()),
                MeshMaterial3d(handles.material.clone()),
            ));
        }
        if let Some(light) = structure.light {
            visual.with_children(|parent| {
                parent.spawn((
                    PointLight {
                        intensity: light.intensity,
                        range: light.range,
                        color: light.color,
                        shadows_enabled: true,
                        ..default()
                    },
                    Transform::from_translation(light.offset),
                ));
            });
        }
    }
}

pub fn despawn_removed_visuals(
    mut commands: Commands,
    mut removed: MessageReader<WorldEntityRemoved>,
    visuals: Query<(Entity, &WorldEntityVisual)>,
) {
    for WorldEntityRemoved { id } in removed.read() {
        for (entity, visual) in &visuals {
            if visual.0 == *id {
                commands.entity(entity).despawn();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::items::{AXE, FOUNDATION, TORCH, WALL, WOOD};

    #[test]
    fn every_placeable_item_gets_a_box() {
        let catalog = ItemCatalog::load_from_assets().unwrap();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let visuals = ItemVisuals::from_footprints(&catalog, &mut meshes, &mut materials);

        assert_eq!(visuals.len(), catalog.placeable_items().len());
        for id in [FOUNDATION, WALL, TORCH, WOOD] {
            let handles = visuals.get(id).unwrap();
            assert!(meshes.get(&handles.mesh).is_some());
            assert!(materials.get(&handles.material).is_some());
        }
        assert!(visuals.get(AXE).is_none());
    }
}
