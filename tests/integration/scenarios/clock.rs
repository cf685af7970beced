use bevy::prelude::*;
use std::time::Duration;

use the_wilds::config::SandboxConfig;

use crate::harness::*;

#[test]
fn zero_frame_step_still_starts() {
    let mut app = headless_app_with(SandboxConfig {
        max_frame_step_secs: 0.0,
        ..test_config()
    });
    tick_n(&mut app, 2);

    let max_delta = app.world().resource::<Time<Virtual>>().max_delta();
    assert!(max_delta > Duration::ZERO);
    assert!(max_delta <= Duration::from_millis(1));
}

#[test]
fn configured_frame_step_caps_the_virtual_clock() {
    let mut app = headless_app();
    tick(&mut app);

    assert_eq!(
        app.world().resource::<Time<Virtual>>().max_delta(),
        Duration::from_secs_f32(0.1)
    );
}
