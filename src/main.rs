use bevy::prelude::*;

use the_wilds::{
    materials::{ItemCatalog, SelectSlotRequest},
    structures::{ItemVisuals, PlaceRequest, WorldEntityVisual},
    world::{AimState, EntityId, LootRng, UseHeldItemRequest, WorldRegistry, WorldTemplates},
    GameplaySet, SandboxPlugin,
};

#[derive(Component)]
struct PlayerCamera;

const SLOT_KEYS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SandboxPlugin)
        .add_systems(Startup, (setup_scene, populate_world))
        .add_systems(
            Update,
            (move_camera, track_aim, forward_input)
                .chain()
                .before(GameplaySet::Input),
        )
        .run();
}

fn setup_scene(
    mut commands: Commands,
    catalog: Res<ItemCatalog>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let visuals = ItemVisuals::from_footprints(&catalog, &mut meshes, &mut materials);
    info!(items = visuals.len(), "building piece visuals registered");
    commands.insert_resource(visuals);

    commands.spawn((
        Camera3d::default(),
        PlayerCamera,
        Transform::from_xyz(0.0, 1.7, 6.0).looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(200.0, 200.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.25))),
    ));
}

/// A fixed clearing: a few trees and rocks, some grass and one supply crate.
fn populate_world(
    mut commands: Commands,
    templates: Res<WorldTemplates>,
    mut world: ResMut<WorldRegistry>,
    mut rng: ResMut<LootRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut draw = |id: EntityId, position: Vec3, mesh: Mesh, color: Color| {
        commands.spawn((
            WorldEntityVisual(id),
            Transform::from_translation(position),
            Mesh3d(meshes.add(mesh)),
            MeshMaterial3d(materials.add(color)),
        ));
    };

    let layout = [
        ("tree", Vec3::new(-4.0, 1.5, -3.0)),
        ("tree", Vec3::new(5.0, 1.5, -6.0)),
        ("tree", Vec3::new(-2.0, 1.5, -10.0)),
        ("rock", Vec3::new(3.0, 0.5, -2.0)),
        ("rock", Vec3::new(-6.0, 0.5, 2.0)),
        ("grass", Vec3::new(1.0, 0.2, 1.0)),
        ("grass", Vec3::new(-1.5, 0.2, 2.5)),
        ("scrap", Vec3::new(2.0, 0.2, 3.0)),
    ];
    for (name, position) in layout {
        match templates.node(name) {
            Ok(template) => {
                let id = world.spawn_node(template, position);
                let color = match name {
                    "tree" => Color::srgb(0.2, 0.45, 0.15),
                    "rock" => Color::srgb(0.5, 0.5, 0.5),
                    _ => Color::srgb(0.4, 0.6, 0.2),
                };
                draw(id, position, Sphere::new(template.radius).into(), color);
            }
            Err(err) => warn!(%err, "skipping node"),
        }
    }
    if let Ok(template) = templates.creature("deer") {
        let position = Vec3::new(8.0, 0.8, 4.0);
        let id = world.spawn_creature(template, position);
        let body = Capsule3d::new(template.radius * 0.5, template.radius);
        draw(id, position, body.into(), Color::srgb(0.55, 0.35, 0.2));
    }
    if let Ok(template) = templates.container("crate") {
        let position = Vec3::new(-3.0, 0.4, 4.0);
        let id = world.spawn_container(template, position, &mut rng.0);
        let side = template.radius * 1.4;
        draw(id, position, Cuboid::new(side, side * 0.6, side).into(), Color::srgb(0.5, 0.35, 0.15));
    }
    info!(entities = world.len(), "world populated");
}

fn move_camera(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut camera: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };

    let forward = transform.forward().with_y(0.0).normalize_or_zero();
    let right = transform.right().with_y(0.0).normalize_or_zero();
    let mut step = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        step += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        step -= forward;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        step += right;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        step -= right;
    }
    transform.translation += step.normalize_or_zero() * 5.0 * time.delta_secs();

    let mut yaw = 0.0;
    if keyboard.pressed(KeyCode::KeyQ) {
        yaw += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        yaw -= 1.0;
    }
    transform.rotate_y(yaw * 1.5 * time.delta_secs());
}

fn track_aim(camera: Query<&GlobalTransform, With<PlayerCamera>>, mut aim: ResMut<AimState>) {
    let Ok(transform) = camera.single() else {
        return;
    };
    aim.set_if_neq(AimState {
        origin: transform.translation(),
        direction: *transform.forward(),
    });
}

fn forward_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut use_requests: MessageWriter<UseHeldItemRequest>,
    mut place_requests: MessageWriter<PlaceRequest>,
    mut select_requests: MessageWriter<SelectSlotRequest>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        use_requests.write(UseHeldItemRequest);
    }
    if mouse.just_pressed(MouseButton::Right) {
        place_requests.write(PlaceRequest);
    }
    for (index, key) in SLOT_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            select_requests.write(SelectSlotRequest { index });
        }
    }
}
