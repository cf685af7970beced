pub mod placement;
pub mod validation;
pub mod visuals;

pub use placement::*;
pub use validation::*;
pub use visuals::*;

use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum StructureSystemSet {
    Preview,
    Validation,
    Placement,
    Visuals,
}

fn configure_structure_system_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            StructureSystemSet::Preview,
            StructureSystemSet::Validation,
            StructureSystemSet::Placement,
            StructureSystemSet::Visuals,
        )
            .chain()
            .in_set(crate::GameplaySet::Placement),
    );
}

pub struct StructuresPlugin;

impl Plugin for StructuresPlugin {
    fn build(&self, app: &mut App) {
        configure_structure_system_sets(app);

        app.init_resource::<PlacementPreview>()
            .init_resource::<ItemVisuals>()
            .add_message::<PlaceRequest>()
            .add_message::<PlacementValidationEvent>()
            .add_message::<PlacementResultEvent>()
            .add_systems(
                Update,
                (
                    update_placement_preview.in_set(StructureSystemSet::Preview),
                    validate_placement.in_set(StructureSystemSet::Validation),
                    place_structure.in_set(StructureSystemSet::Placement),
                    (spawn_structure_visuals, despawn_removed_visuals)
                        .in_set(StructureSystemSet::Visuals),
                ),
            );
    }
}
