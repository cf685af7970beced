use bevy::prelude::*;

use super::app::FRAME_SECS;

pub fn tick(app: &mut App) {
    app.update();
}

pub fn tick_n(app: &mut App, n: u32) {
    for _ in 0..n {
        app.update();
    }
}

/// Runs enough fixed-length frames to cover `secs` of game time.
pub fn tick_seconds(app: &mut App, secs: f32) {
    let frames = (f64::from(secs) / FRAME_SECS).ceil() as u32;
    tick_n(app, frames);
}

/// Sends one message and runs a frame so the plugins pick it up.
pub fn send<M: Message>(app: &mut App, message: M) {
    app.world_mut().write_message(message);
    app.update();
}
