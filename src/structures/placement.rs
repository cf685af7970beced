use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::config::SandboxConfig;
use crate::grid::SnapGrid;
use crate::materials::{BuildType, InventoryStore, ItemCatalog, ItemDefinition, ItemId};
use crate::world::{AimState, SceneSurfaces, Terrain, WorldRegistry, WorldSurfaces};

/// A resolved position and orientation for a buildable item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub grid_cell: IVec2,
    /// Distance from the aim origin to the surface that was hit.
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRules {
    pub reach: f32,
    pub structural_grid: f32,
    pub freeform_grid: f32,
    pub foundation_height: f32,
    pub surface_offset: f32,
    pub ground_clearance: f32,
}

impl From<&SandboxConfig> for PlacementRules {
    fn from(config: &SandboxConfig) -> Self {
        Self {
            reach: config.placement_reach,
            structural_grid: config.structural_grid,
            freeform_grid: config.freeform_grid,
            foundation_height: config.foundation_height,
            surface_offset: config.surface_offset,
            ground_clearance: config.ground_clearance,
        }
    }
}

impl PlacementRules {
    pub fn grid_for(&self, build_type: BuildType) -> SnapGrid {
        if build_type.is_structural() {
            SnapGrid::new(self.structural_grid)
        } else {
            SnapGrid::new(self.freeform_grid)
        }
    }
}

/// Walls and doors turn a quarter so they face across the player's line
/// of sight.
pub fn facing_rotation(build_type: BuildType, look: Vec3) -> Quat {
    if build_type.is_vertical_plane() && look.x.abs() > look.z.abs() {
        Quat::from_rotation_y(FRAC_PI_2)
    } else {
        Quat::IDENTITY
    }
}

/// Works out where `item` would go for the given aim ray, or `None` when
/// the item is not buildable or no surface is within reach.
///
/// The hit point is nudged off the surface, snapped to the item's grid, then
/// lifted: foundations sit on the ground or on top of another foundation,
/// walls and roofs stack on the piece below them, everything else rests on
/// the surface it was aimed at. The base is never allowed below ground.
pub fn plan(
    ray: Ray3d,
    item: &ItemDefinition,
    surfaces: &impl WorldSurfaces,
    rules: &PlacementRules,
) -> Option<PlacementPose> {
    let build_type = item.build_type?;
    let hit = surfaces.raycast(ray, rules.reach)?;
    if hit.distance > rules.reach {
        return None;
    }

    let size = item.footprint();
    let half_height = size.y / 2.0;
    let lifted = hit.point + hit.normal * rules.surface_offset;

    let grid = rules.grid_for(build_type);
    let grid_cell = grid.world_to_cell(lifted);
    let centre = grid.cell_to_world(grid_cell);
    let ground = surfaces.height_at(centre.x, centre.y).unwrap_or(0.0);

    let support = surfaces
        .nearest_supporting_structure(hit.point)
        .filter(|support| build_type.rests_on(support.build_type));

    let mut y = match (build_type, support) {
        (_, Some(support)) => support.top_height + half_height,
        (BuildType::Foundation, None) if hit.structure.is_none() => ground + half_height,
        (BuildType::Foundation, None) => {
            let step = rules.foundation_height.max(f32::EPSILON);
            (lifted.y / step).round() * step + half_height
        }
        (_, None) => lifted.y + half_height,
    };
    if y - half_height < ground + rules.ground_clearance {
        y = ground + half_height + rules.ground_clearance;
    }

    Some(PlacementPose {
        position: Vec3::new(centre.x, y, centre.y),
        rotation: facing_rotation(build_type, *ray.direction),
        grid_cell,
        distance: hit.distance,
    })
}

/// Where the currently held item would land, refreshed every frame.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlacementPreview {
    pub item_id: Option<ItemId>,
    pub pose: Option<PlacementPose>,
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct PlaceRequest;

pub fn update_placement_preview(
    aim: Res<AimState>,
    inventory: Res<InventoryStore>,
    catalog: Res<ItemCatalog>,
    terrain: Res<Terrain>,
    world: Res<WorldRegistry>,
    config: Res<SandboxConfig>,
    mut preview: ResMut<PlacementPreview>,
) {
    let held = inventory
        .selected_item()
        .and_then(|stack| catalog.get(&stack.item_id).ok())
        .filter(|def| def.placeable());
    let next = match (held, aim.ray()) {
        (Some(def), Ok(ray)) => {
            let surfaces = SceneSurfaces {
                terrain: &terrain,
                world: &world,
            };
            PlacementPreview {
                item_id: Some(def.id.clone()),
                pose: plan(ray, def, &surfaces, &PlacementRules::from(&*config)),
            }
        }
        _ => PlacementPreview::default(),
    };
    preview.set_if_neq(next);
}
