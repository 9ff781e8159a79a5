//! Player movement and ability state machine.
//!
//! Runs once per frame after collision resolution. Collision responses have
//! already armed the boost or opened the glue window in [`PlayerState`]; this
//! step turns intents into a velocity and derives the pose.
//!
//! Order within a frame:
//!
//! 1. Horizontal speed from the direction intents (right wins a tie)
//! 2. Grounded jump, boosted if armed
//! 3. Glue escape jump, overriding step 2 when its window is open
//! 4. Pose from the resulting velocity
//! 5. Glue window shrinks by one frame, boost disarms

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::Intents;
use crate::tuning::PlayerTuning;

/// Mutable per-level player state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Velocity in world units per second, `y` down
    pub velocity: Vec2,
    /// Set by a boost contact, lives until the end of the frame
    pub jump_boost_armed: bool,
    /// Frames left in which the glue escape jump is available
    pub glue_cooldown: u32,
}

impl PlayerState {
    /// Pose for the current velocity.
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::from_velocity(self.velocity)
    }

    /// Back to rest: no velocity, no boost, no glue window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Sprite pose, one per spritesheet frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pose {
    /// Standing still
    Idle,
    /// Moving right
    RunRight,
    /// Moving left
    RunLeft,
    /// Moving up
    Rising,
    /// Moving down
    Falling,
}

impl Pose {
    /// Pose for a velocity. Vertical motion takes precedence.
    #[must_use]
    pub fn from_velocity(velocity: Vec2) -> Self {
        if velocity.y < 0.0 {
            Self::Rising
        } else if velocity.y > 0.0 {
            Self::Falling
        } else if velocity.x > 0.0 {
            Self::RunRight
        } else if velocity.x < 0.0 {
            Self::RunLeft
        } else {
            Self::Idle
        }
    }

    /// Spritesheet frame index.
    #[must_use]
    pub const fn frame(self) -> u32 {
        match self {
            Self::Idle => 0,
            Self::RunRight => 1,
            Self::RunLeft => 2,
            Self::Rising => 3,
            Self::Falling => 4,
        }
    }
}

/// Advances the player one frame and returns the pose to display.
///
/// `state.velocity` must hold the body's post-collision velocity on entry;
/// on return it holds the velocity to write back.
///
/// # Example
///
/// ```
/// use nubium_core::input::Intents;
/// use nubium_core::player::{step, PlayerState, Pose};
/// use nubium_core::tuning::PlayerTuning;
///
/// let mut state = PlayerState::default();
/// let intents = Intents { move_left: true, move_right: true, jump: true };
/// let pose = step(&mut state, intents, true, &PlayerTuning::default());
///
/// assert_eq!(state.velocity.x, 240.0);
/// assert_eq!(state.velocity.y, -600.0);
/// assert_eq!(pose, Pose::Rising);
/// ```
pub fn step(
    state: &mut PlayerState,
    intents: Intents,
    grounded: bool,
    tuning: &PlayerTuning,
) -> Pose {
    state.velocity.x = if intents.move_right {
        tuning.run_speed
    } else if intents.move_left {
        -tuning.run_speed
    } else {
        0.0
    };

    if intents.jump && grounded {
        state.velocity.y = if state.jump_boost_armed {
            -tuning.boost_jump_speed
        } else {
            -tuning.jump_speed
        };
    }

    if intents.jump && state.glue_cooldown != 0 {
        state.velocity.y = -tuning.glue_jump_speed;
        state.glue_cooldown = 0;
    }

    let pose = state.pose();
    state.glue_cooldown = state.glue_cooldown.saturating_sub(1);
    state.jump_boost_armed = false;
    pose
}
