//! Gameplay tuning for the player and level objects.
//!
//! Keep this separate from session configuration (viewport, timestep, key
//! bindings). Velocities are in world units per second with `y` pointing
//! down, so jumps are negative.

use serde::{Deserialize, Serialize};

/// Fixed simulation timestep (1/60 second).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Movement and ability constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal speed while a direction is held.
    pub run_speed: f32,

    /// Upward speed of a normal jump.
    pub jump_speed: f32,

    /// Upward speed of a jump taken while the boost is armed.
    pub boost_jump_speed: f32,

    /// Upward speed of the escape jump out of glue.
    pub glue_jump_speed: f32,

    /// Frames the glue escape jump stays available after contact.
    pub glue_cooldown_frames: u32,

    /// Downward acceleration applied to the player.
    pub gravity: f32,

    /// Descent speed of a falling platform once stepped on.
    pub fall_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            run_speed: 240.0,
            jump_speed: 600.0,
            boost_jump_speed: 700.0,
            glue_jump_speed: 300.0,
            glue_cooldown_frames: 10,
            gravity: 1000.0,
            fall_speed: 50.0,
        }
    }
}
