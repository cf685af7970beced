use bevy::prelude::*;

use the_wilds::{
    materials::{InventoryStore, SelectSlotRequest, Zone},
    world::{AimState, EntityId, LootRng, WorldRegistry, WorldTemplates},
};

pub fn spawn_node(world: &mut World, name: &str, position: Vec3) -> EntityId {
    world.resource_scope(|world, templates: Mut<WorldTemplates>| {
        let template = templates
            .node(name)
            .unwrap_or_else(|err| panic!("no node template '{name}': {err}"));
        world.resource_mut::<WorldRegistry>().spawn_node(template, position)
    })
}

pub fn spawn_creature(world: &mut World, species: &str, position: Vec3) -> EntityId {
    world.resource_scope(|world, templates: Mut<WorldTemplates>| {
        let template = templates
            .creature(species)
            .unwrap_or_else(|err| panic!("no creature template '{species}': {err}"));
        world
            .resource_mut::<WorldRegistry>()
            .spawn_creature(template, position)
    })
}

pub fn spawn_container(world: &mut World, container_type: &str, position: Vec3) -> EntityId {
    world.resource_scope(|world, templates: Mut<WorldTemplates>| {
        let template = templates
            .container(container_type)
            .unwrap_or_else(|err| panic!("no container template '{container_type}': {err}"));
        world.resource_scope(|world, mut rng: Mut<LootRng>| {
            world
                .resource_mut::<WorldRegistry>()
                .spawn_container(template, position, &mut rng.0)
        })
    })
}

pub fn aim_at(world: &mut World, origin: Vec3, target: Vec3) {
    *world.resource_mut::<AimState>() = AimState::looking_at(origin, target);
}

pub fn give(world: &mut World, item: &str, count: u32) {
    let added = world
        .resource_mut::<InventoryStore>()
        .add(item, count)
        .unwrap_or_else(|err| panic!("could not give {count}x '{item}': {err}"));
    assert_eq!(added, count, "inventory had no room for {count}x '{item}'");
}

/// Selects the quick slot holding `item`.
pub fn select_item(world: &mut World, item: &str) {
    let slot = world
        .resource::<InventoryStore>()
        .iter_stacks()
        .find(|(slot, stack)| stack.item_id == item && slot.zone == Zone::QuickBar)
        .map(|(slot, _)| slot)
        .unwrap_or_else(|| panic!("no quick slot holds '{item}'"));
    world.write_message(SelectSlotRequest { index: slot.index });
}

pub fn hold(world: &mut World, item: &str, count: u32) {
    give(world, item, count);
    select_item(world, item);
}
