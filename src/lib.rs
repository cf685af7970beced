// Consumed by the host binary and the integration tests, not published as an
// API, so the library-facing pedantic lints stay off.
#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::implicit_hasher
)]

pub mod config;
pub mod constants;
pub mod grid;
pub mod hud;
pub mod materials;
pub mod structures;
pub mod world;

#[cfg(debug_assertions)]
pub mod invariants;

use bevy::prelude::*;

use config::SandboxConfig;
use hud::HudPlugin;
use materials::MaterialsPlugin;
use structures::StructuresPlugin;
use world::WorldPlugin;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum GameplaySet {
    Input,
    Commands,
    Interaction,
    Placement,
    Feedback,
}

pub fn configure_system_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            GameplaySet::Input,
            GameplaySet::Commands,
            GameplaySet::Interaction,
            GameplaySet::Placement,
            GameplaySet::Feedback,
        )
            .chain(),
    );
}

/// Everything the sandbox core needs: inventory and crafting, the world
/// registry and interaction, placement, and the HUD snapshot.
///
/// Rendering, camera control and world generation belong to the host app.
pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        configure_system_sets(app);
        if !app.world().contains_resource::<SandboxConfig>() {
            app.insert_resource(SandboxConfig::load_from_assets());
        }

        app.add_plugins((MaterialsPlugin, WorldPlugin, StructuresPlugin, HudPlugin))
            .add_systems(Startup, configure_frame_clock);
    }
}

fn configure_frame_clock(config: Res<SandboxConfig>, mut time: ResMut<Time<Virtual>>) {
    time.set_max_delta(config.max_frame_step());
}
