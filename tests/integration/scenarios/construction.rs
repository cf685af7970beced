use bevy::prelude::*;

use the_wilds::{
    materials::{CraftRequest, ItemCatalog, SelectSlotRequest},
    structures::{ItemVisuals, PlaceRequest, PlacementPreview, WorldEntityVisual},
    world::{EntityKind, WorldRegistry},
};

use crate::harness::*;

#[test]
fn crafted_foundation_snaps_onto_the_grid() {
    let mut app = headless_app();
    tick(&mut app);
    give(app.world_mut(), "stone", 4);
    send(
        &mut app,
        CraftRequest {
            item_id: "foundation".to_string(),
        },
    );
    assert_item_count(app.world(), "foundation", 1);

    select_item(app.world_mut(), "foundation");
    aim_at(
        app.world_mut(),
        Vec3::new(7.3, 3.0, 8.0),
        Vec3::new(7.3, 0.0, 11.9),
    );
    send(&mut app, PlaceRequest);

    let placed = placed_structures(app.world(), "foundation");
    assert_eq!(placed.len(), 1);
    let entity = app.world().resource::<WorldRegistry>().get(placed[0]).cloned();
    let position = entity.map(|entity| entity.position).unwrap_or_default();
    assert_eq!((position.x, position.z), (8.0, 12.0));
    assert!((position.y - 0.26).abs() < 1e-3);

    assert_item_count(app.world(), "foundation", 0);
    assert_feedback(app.world(), "Placed Foundation");
}

#[test]
fn placed_structures_get_a_visual() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "wall", 2);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -3.0));
    tick(&mut app);

    send(&mut app, PlaceRequest);

    let placed = placed_structures(app.world(), "wall");
    assert_eq!(placed.len(), 1);
    let visuals: Vec<u32> = app
        .world_mut()
        .query::<&WorldEntityVisual>()
        .iter(app.world())
        .map(|visual| visual.0)
        .collect();
    assert_eq!(visuals, placed);
    assert_item_count(app.world(), "wall", 1);
}

#[test]
fn registered_pieces_are_drawn_with_their_mesh() {
    let mut app = headless_app();
    tick(&mut app);
    let mut meshes = Assets::<Mesh>::default();
    let mut materials = Assets::<StandardMaterial>::default();
    let visuals = ItemVisuals::from_footprints(
        app.world().resource::<ItemCatalog>(),
        &mut meshes,
        &mut materials,
    );
    let wall_mesh = visuals.get("wall").map(|handles| handles.mesh.clone());
    assert!(wall_mesh.is_some());
    app.world_mut().insert_resource(visuals);

    hold(app.world_mut(), "wall", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -3.0));
    tick(&mut app);
    send(&mut app, PlaceRequest);

    let drawn: Vec<Handle<Mesh>> = app
        .world_mut()
        .query_filtered::<&Mesh3d, With<WorldEntityVisual>>()
        .iter(app.world())
        .map(|mesh| mesh.0.clone())
        .collect();
    assert_eq!(drawn.len(), 1);
    assert_eq!(Some(drawn[0].clone()), wall_mesh);
}

#[test]
fn torches_bring_their_own_light() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "torch", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 0.0, -2.0));
    tick(&mut app);

    send(&mut app, PlaceRequest);

    let lights = app
        .world_mut()
        .query::<(&PointLight, &ChildOf)>()
        .iter(app.world())
        .count();
    assert_eq!(lights, 1);
    let placed = placed_structures(app.world(), "torch");
    let has_light = app
        .world()
        .resource::<WorldRegistry>()
        .get(placed[0])
        .is_some_and(|entity| {
            matches!(&entity.kind, EntityKind::PlacedStructure(structure) if structure.light.is_some())
        });
    assert!(has_light);
}

#[test]
fn aiming_at_the_sky_builds_nothing() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "foundation", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 5.0, -10.0));
    tick(&mut app);

    send(&mut app, PlaceRequest);

    assert!(placed_structures(app.world(), "foundation").is_empty());
    assert_item_count(app.world(), "foundation", 1);
    assert_feedback(app.world(), "Nothing to build on");
}

#[test]
fn tools_cannot_be_placed() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "axe", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -2.0));
    tick(&mut app);

    send(&mut app, PlaceRequest);

    assert!(app.world().resource::<WorldRegistry>().is_empty());
    assert_item_count(app.world(), "axe", 1);
    assert_feedback(app.world(), "axe can't be placed");
}

#[test]
fn empty_hands_place_nothing_quietly() {
    let mut app = headless_app();
    tick(&mut app);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -2.0));

    send(&mut app, PlaceRequest);

    assert!(app.world().resource::<WorldRegistry>().is_empty());
    assert_no_feedback(app.world());
}

#[test]
fn preview_follows_the_held_item() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "wall", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, -3.0));
    tick(&mut app);

    let preview = app.world().resource::<PlacementPreview>().clone();
    assert_eq!(preview.item_id.as_deref(), Some("wall"));
    assert!(preview.pose.is_some());

    send(&mut app, SelectSlotRequest { index: 7 });
    assert_eq!(
        *app.world().resource::<PlacementPreview>(),
        PlacementPreview::default()
    );
}

#[test]
fn walls_stack_on_a_placed_foundation() {
    let mut app = headless_app();
    tick(&mut app);
    hold(app.world_mut(), "foundation", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 3.0, 2.0), Vec3::new(0.0, 0.0, 0.0));
    tick(&mut app);
    send(&mut app, PlaceRequest);
    assert_eq!(placed_structures(app.world(), "foundation").len(), 1);

    hold(app.world_mut(), "wall", 1);
    aim_at(app.world_mut(), Vec3::new(0.0, 3.0, 3.0), Vec3::new(0.5, 0.51, 0.5));
    tick(&mut app);
    send(&mut app, PlaceRequest);

    let walls = placed_structures(app.world(), "wall");
    assert_eq!(walls.len(), 1);
    let y = app
        .world()
        .resource::<WorldRegistry>()
        .get(walls[0])
        .map(|entity| entity.position.y)
        .unwrap_or_default();
    assert!((y - 2.01).abs() < 1e-3, "wall centre at {y}");
}
