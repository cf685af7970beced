use bevy::prelude::*;

use the_wilds::{
    hud::ActionFeedback,
    materials::InventoryStore,
    world::{EntityId, EntityKind, WorldRegistry},
};

pub fn assert_item_count(world: &World, item: &str, expected: u32) {
    let actual = world.resource::<InventoryStore>().count(item);
    assert_eq!(
        actual, expected,
        "inventory: expected {expected}x '{item}', found {actual}"
    );
}

pub fn assert_feedback(world: &World, expected: &str) {
    let feedback = world.resource::<ActionFeedback>();
    assert_eq!(
        feedback.message(),
        Some(expected),
        "expected feedback '{expected}', found {:?}",
        feedback.message()
    );
}

pub fn assert_no_feedback(world: &World) {
    let feedback = world.resource::<ActionFeedback>();
    assert!(
        feedback.message().is_none(),
        "expected no feedback, found {:?}",
        feedback.message()
    );
}

pub fn assert_entity_exists(world: &World, id: EntityId) {
    assert!(
        world.resource::<WorldRegistry>().get(id).is_some(),
        "world entity {id} should exist"
    );
}

pub fn assert_entity_gone(world: &World, id: EntityId) {
    let registry = world.resource::<WorldRegistry>();
    assert!(registry.get(id).is_none(), "world entity {id} should be gone");
    assert!(
        !registry.is_interactable(id) && !registry.is_collidable(id),
        "world entity {id} is still indexed"
    );
}

pub fn placed_structures(world: &World, item: &str) -> Vec<EntityId> {
    world
        .resource::<WorldRegistry>()
        .iter()
        .filter(|entity| {
            matches!(&entity.kind, EntityKind::PlacedStructure(structure) if structure.item_id == item)
        })
        .map(|entity| entity.id)
        .collect()
}
