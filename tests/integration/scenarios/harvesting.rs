use bevy::prelude::*;

use the_wilds::world::{UseHeldItemRequest, WorldRegistry};

use crate::harness::*;

const EYE: Vec3 = Vec3::new(0.0, 1.7, 0.0);

#[test]
fn four_axe_hits_fell_a_tree() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "axe", 1);
    let tree = spawn_node(app.world_mut(), "tree", Vec3::new(0.0, 1.0, -3.0));
    aim_at(app.world_mut(), EYE, Vec3::new(0.0, 1.0, -3.0));
    tick(&mut app);

    for _ in 0..3 {
        send(&mut app, UseHeldItemRequest);
        assert_entity_exists(app.world(), tree);
    }
    assert_item_count(app.world(), "wood", 0);

    send(&mut app, UseHeldItemRequest);

    assert_entity_gone(app.world(), tree);
    let wood = app.world().resource::<the_wilds::materials::InventoryStore>().count("wood");
    assert!((3..=6).contains(&wood), "tree dropped {wood} wood");
}

#[test]
fn trees_need_an_axe() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "pickaxe", 1);
    let tree = spawn_node(app.world_mut(), "tree", Vec3::new(0.0, 1.0, -3.0));
    aim_at(app.world_mut(), EYE, Vec3::new(0.0, 1.0, -3.0));
    tick(&mut app);

    for _ in 0..6 {
        send(&mut app, UseHeldItemRequest);
    }

    assert_entity_exists(app.world(), tree);
    assert_item_count(app.world(), "wood", 0);
    assert_feedback(app.world(), "Requires axe");
}

#[test]
fn grass_comes_up_in_one_pull() {
    let mut app = headless_app();
    tick(&mut app);
    let grass = spawn_node(app.world_mut(), "grass", Vec3::new(1.0, 0.3, -2.0));
    aim_at(app.world_mut(), EYE, Vec3::new(1.0, 0.3, -2.0));

    send(&mut app, UseHeldItemRequest);

    assert_entity_gone(app.world(), grass);
    assert_item_count(app.world(), "grass", 1);
    assert_feedback(app.world(), "+1 Grass");
}

#[test]
fn targets_beyond_reach_are_ignored() {
    let mut app = headless_app();
    tick(&mut app);
    let grass = spawn_node(app.world_mut(), "grass", Vec3::new(0.0, 1.7, -12.0));
    aim_at(app.world_mut(), EYE, Vec3::new(0.0, 1.7, -12.0));

    send(&mut app, UseHeldItemRequest);

    assert_entity_exists(app.world(), grass);
    assert_item_count(app.world(), "grass", 0);
    assert_no_feedback(app.world());
}

#[test]
fn a_crate_can_only_be_searched_once() {
    let mut app = headless_app();
    tick(&mut app);
    let crate_id = spawn_container(app.world_mut(), "crate", Vec3::new(0.0, 0.7, -2.5));
    aim_at(app.world_mut(), EYE, Vec3::new(0.0, 0.7, -2.5));

    send(&mut app, UseHeldItemRequest);
    let looted: u32 = ["scrap_metal", "nails", "rope"]
        .iter()
        .map(|item| app.world().resource::<the_wilds::materials::InventoryStore>().count(item))
        .sum();
    assert!(looted > 0, "crate gave nothing");

    send(&mut app, UseHeldItemRequest);
    assert_entity_exists(app.world(), crate_id);
    assert_feedback(app.world(), "Already searched");
}

#[test]
fn loot_bags_disappear_once_searched() {
    let mut app = headless_app();
    tick(&mut app);
    let bag = spawn_container(app.world_mut(), "loot_bag", Vec3::new(0.5, 0.4, -2.0));
    aim_at(app.world_mut(), EYE, Vec3::new(0.5, 0.4, -2.0));

    send(&mut app, UseHeldItemRequest);

    assert_entity_gone(app.world(), bag);
    assert!(!app.world().resource::<WorldRegistry>().has_pending_removals());
}

#[test]
fn a_knife_brings_down_a_deer_in_two_strikes() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "knife", 1);
    let deer = spawn_creature(app.world_mut(), "deer", Vec3::new(0.0, 1.0, -3.0));
    aim_at(app.world_mut(), EYE, Vec3::new(0.0, 1.0, -3.0));
    tick(&mut app);

    send(&mut app, UseHeldItemRequest);
    assert_entity_exists(app.world(), deer);

    send(&mut app, UseHeldItemRequest);
    assert_entity_gone(app.world(), deer);
    let meat = app.world().resource::<the_wilds::materials::InventoryStore>().count("meat");
    assert!((2..=4).contains(&meat), "deer dropped {meat} meat");
}
