use bevy::prelude::*;

use the_wilds::{
    hud::HudState,
    materials::{
        CookRequest, CraftError, CraftKind, CraftRequest, CraftResultEvent, InventoryStore,
        MoveSlotRequest, SlotRef,
    },
};

use crate::harness::*;

fn craft(item: &str) -> CraftRequest {
    CraftRequest {
        item_id: item.to_string(),
    }
}

#[test]
fn crafting_planks_consumes_wood_and_yields_four() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "wood", 2);

    send(&mut app, craft("planks"));

    assert_item_count(app.world(), "wood", 1);
    assert_item_count(app.world(), "planks", 4);
    assert_feedback(app.world(), "Crafted Planks");
}

#[test]
fn crafting_without_resources_changes_nothing() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "stone", 1);

    send(&mut app, craft("foundation"));

    assert_item_count(app.world(), "stone", 1);
    assert_item_count(app.world(), "foundation", 0);
    assert_feedback(app.world(), "Not enough resources");
}

#[test]
fn unknown_recipe_is_reported_not_fatal() {
    let mut app = headless_app();
    tick(&mut app);

    send(&mut app, craft("dragon_egg"));

    assert_feedback(app.world(), "unknown item 'dragon_egg'");
}

#[test]
fn cooking_turns_raw_meat_into_cooked_meat() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "meat", 2);

    send(
        &mut app,
        CookRequest {
            item_id: "meat".to_string(),
        },
    );

    assert_item_count(app.world(), "meat", 1);
    assert_item_count(app.world(), "cooked_meat", 1);
    assert_feedback(app.world(), "+1 Cooked Meat");
}

#[test]
fn feedback_clears_after_a_couple_of_seconds() {
    let mut app = headless_app();
    tick(&mut app);

    send(&mut app, craft("axe"));
    assert_feedback(app.world(), "Not enough resources");

    tick_seconds(&mut app, 2.1);
    assert_no_feedback(app.world());
}

#[test]
fn hud_recipe_book_tracks_the_inventory() {
    let mut app = headless_app();
    tick(&mut app);

    let axe_ready = |app: &App| {
        app.world()
            .resource::<HudState>()
            .recipes
            .iter()
            .find(|recipe| recipe.item_id == "axe")
            .map(|recipe| recipe.can_craft)
    };
    assert_eq!(axe_ready(&app), Some(false));

    give(app.world_mut(), "wood", 3);
    give(app.world_mut(), "stone", 1);
    tick(&mut app);
    assert_eq!(axe_ready(&app), Some(true));

    send(&mut app, craft("axe"));
    assert_eq!(axe_ready(&app), Some(false));
    assert_item_count(app.world(), "axe", 1);
}

#[test]
fn moving_a_stack_into_storage_shows_in_the_hud() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "rope", 3);

    send(
        &mut app,
        MoveSlotRequest {
            from: SlotRef::quick(0),
            to: SlotRef::main(5),
        },
    );

    let hud = app.world().resource::<HudState>();
    assert!(hud.quick_bar[0].is_none());
    let moved = hud.storage[5].as_ref().map(|view| (view.item_id.as_str(), view.count));
    assert_eq!(moved, Some(("rope", 3)));
}

#[test]
fn out_of_range_move_is_ignored() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "rope", 3);
    let before = app.world().resource::<InventoryStore>().contents();

    send(
        &mut app,
        MoveSlotRequest {
            from: SlotRef::quick(0),
            to: SlotRef::main(500),
        },
    );

    assert_eq!(app.world().resource::<InventoryStore>().contents(), before);
}

#[derive(Resource, Default)]
struct CraftLog(Vec<Result<CraftKind, CraftError>>);

fn record_crafts(
    mut results: MessageReader<CraftResultEvent>,
    mut log: ResMut<CraftLog>,
) {
    log.0.extend(results.read().map(|event| event.result.clone()));
}

#[test]
fn walls_until_the_stone_runs_out() {
    let mut app = headless_app_with(the_wilds::config::SandboxConfig {
        starting_inventory: vec![
            ("wood".to_string(), 5),
            ("stone".to_string(), 5),
            ("axe".to_string(), 1),
        ],
        ..test_config()
    });
    app.init_resource::<CraftLog>()
        .add_systems(
            Update,
            record_crafts.in_set(the_wilds::GameplaySet::Feedback),
        );
    tick(&mut app);

    for _ in 0..5 {
        send(&mut app, craft("wall"));
        assert_item_count(app.world(), "wood", 5);
    }

    let log = &app.world().resource::<CraftLog>().0;
    assert_eq!(log.len(), 5);
    assert!(log[..2].iter().all(Result::is_ok));
    assert!(log[2..]
        .iter()
        .all(|result| matches!(result, Err(CraftError::InsufficientResources { .. }))));
    assert_item_count(app.world(), "wall", 2);
    assert_item_count(app.world(), "stone", 1);
}
