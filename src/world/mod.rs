use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod entities;
pub mod interaction;
pub mod surfaces;
pub mod templates;

pub use entities::{
    ContainerState, EntityId, EntityKind, Harvestable, ItemAmount, LightSpec, NodeState,
    PlacedStructure, SupportInfo, WorldEntity, WorldRegistry, YieldEntry, YieldRange,
};
pub use interaction::{
    resolve, AimState, InteractionError, InteractionOutcome, InteractionRules,
};
pub use surfaces::{FlatGround, HeightField, SceneSurfaces, SurfaceHit, Terrain, WorldSurfaces};
pub use templates::{ContainerTemplate, CreatureTemplate, NodeTemplate, TemplateError, WorldTemplates};

use crate::config::SandboxConfig;
use crate::materials::{InventoryStore, ItemCatalog};
use crate::GameplaySet;

/// Source of randomness for drops and container loot.
#[derive(Resource)]
pub struct LootRng(pub StdRng);

impl LootRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self(seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64))
    }
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct UseHeldItemRequest;

#[derive(Message, Debug, Clone)]
pub struct InteractionEvent {
    pub outcome: InteractionOutcome,
}

/// Sent once for every entity that leaves the world, so its visual can go too.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldEntityRemoved {
    pub id: EntityId,
}

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let seed = app
            .world()
            .get_resource::<SandboxConfig>()
            .and_then(|config| config.loot_seed);
        let templates = WorldTemplates::load_from_assets().unwrap_or_else(|err| {
            error!(%err, "failed to load world templates");
            WorldTemplates::default()
        });

        app.init_resource::<Terrain>()
            .init_resource::<WorldRegistry>()
            .init_resource::<AimState>()
            .insert_resource(templates)
            .insert_resource(LootRng::from_seed(seed))
            .add_message::<UseHeldItemRequest>()
            .add_message::<InteractionEvent>()
            .add_message::<WorldEntityRemoved>()
            .add_systems(Startup, check_templates)
            .add_systems(
                Update,
                (handle_use_requests, publish_removals)
                    .chain()
                    .in_set(GameplaySet::Interaction),
            );
    }
}

fn check_templates(templates: Res<WorldTemplates>, catalog: Res<ItemCatalog>) {
    if let Err(err) = templates.validate(&catalog) {
        warn!(%err, "world templates refer to items the catalog lacks");
    }
}

pub fn handle_use_requests(
    mut requests: MessageReader<UseHeldItemRequest>,
    aim: Res<AimState>,
    catalog: Res<ItemCatalog>,
    config: Res<SandboxConfig>,
    mut inventory: ResMut<InventoryStore>,
    mut world: ResMut<WorldRegistry>,
    mut rng: ResMut<LootRng>,
    mut outcomes: MessageWriter<InteractionEvent>,
) {
    let rules = InteractionRules::from(&*config);
    for _ in requests.read() {
        let held = inventory
            .selected_item()
            .and_then(|stack| catalog.get(&stack.item_id).ok())
            .cloned();
        let outcome = resolve(
            &mut world,
            &mut inventory,
            &aim,
            held.as_ref(),
            &rules,
            &mut rng.0,
        );
        outcomes.write(InteractionEvent { outcome });
    }
}

pub fn publish_removals(
    mut world: ResMut<WorldRegistry>,
    mut removed: MessageWriter<WorldEntityRemoved>,
) {
    if !world.has_pending_removals() {
        return;
    }
    for id in world.drain_removals() {
        removed.write(WorldEntityRemoved { id });
    }
}
