use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use the_wilds::{config::SandboxConfig, invariants::InvariantPlugin, SandboxPlugin};

pub const TEST_SEED: u64 = 7;
pub const FRAME_SECS: f64 = 1.0 / 60.0;

/// Default config with reproducible loot and an empty starting inventory.
pub fn test_config() -> SandboxConfig {
    SandboxConfig {
        starting_inventory: Vec::new(),
        loot_seed: Some(TEST_SEED),
        ..SandboxConfig::default()
    }
}

pub fn headless_app() -> App {
    headless_app_with(test_config())
}

pub fn headless_app_with(config: SandboxConfig) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        FRAME_SECS,
    )));

    app.insert_resource(config);
    app.add_plugins(SandboxPlugin);

    app.add_plugins(InvariantPlugin);

    app
}
