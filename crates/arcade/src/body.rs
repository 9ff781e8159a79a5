//! Bodies: the axis-aligned rigid boxes stored in a [`World`](crate::World).

use std::fmt;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Aabb;

bitflags! {
    /// Faces of a body that are in contact with something this step.
    ///
    /// Cleared at the start of every [`World::step`](crate::World::step).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Touching: u8 {
        /// Top face
        const UP = 0b0001;
        /// Bottom face (standing on something)
        const DOWN = 0b0010;
        /// Left face
        const LEFT = 0b0100;
        /// Right face
        const RIGHT = 0b1000;
    }
}

/// Unique identifier for a body within a world.
///
/// IDs are assigned monotonically and never reused, so iterating bodies in
/// ID order is iterating them in spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(u64);

impl BodyId {
    /// Creates a `BodyId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An axis-aligned box with arcade-style physics state.
///
/// # Immovable bodies
///
/// An immovable body is never displaced by separation, but it still
/// integrates its own velocity. A platform that starts falling is an
/// immovable body with a non-zero velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world units
    pub position: Vec2,
    /// Width and height in world units
    pub size: Vec2,
    /// Velocity in world units per second
    pub velocity: Vec2,
    /// Constant acceleration in world units per second squared
    pub gravity: Vec2,
    /// Never pushed by separation
    pub immovable: bool,
    /// Clamped into the world bounds after integration
    pub collide_world_bounds: bool,
    /// Faces touching another body this step
    pub touching: Touching,
    /// Faces blocked by the world bounds this step
    pub blocked: Touching,
    /// Position before the last integration
    pub prev_position: Vec2,
}

impl Body {
    /// A body that separation may push around.
    #[must_use]
    pub fn dynamic(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            gravity: Vec2::ZERO,
            immovable: false,
            collide_world_bounds: false,
            touching: Touching::empty(),
            blocked: Touching::empty(),
            prev_position: position,
        }
    }

    /// A body that separation never moves.
    #[must_use]
    pub fn immovable(position: Vec2, size: Vec2) -> Self {
        Self {
            immovable: true,
            ..Self::dynamic(position, size)
        }
    }

    /// Sets the body's gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Clamps the body into the world bounds.
    #[must_use]
    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    /// Current bounding box.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    /// Bounding box before the last integration.
    #[must_use]
    pub fn prev_aabb(&self) -> Aabb {
        Aabb::new(self.prev_position, self.size)
    }

    /// Resting on the bottom edge of the world.
    #[must_use]
    pub fn on_floor(&self) -> bool {
        self.blocked.contains(Touching::DOWN)
    }

    /// Resting on the world floor or on top of another body.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.on_floor() || self.touching.contains(Touching::DOWN)
    }

    /// Advances the body by one timestep (semi-implicit Euler).
    pub(crate) fn integrate(&mut self, dt: f32) {
        self.prev_position = self.position;
        self.touching = Touching::empty();
        self.blocked = Touching::empty();
        self.velocity += self.gravity * dt;
        self.position += self.velocity * dt;
    }

    /// Keeps the body inside `bounds`, recording the blocked faces.
    pub(crate) fn clamp_to(&mut self, bounds: &Aabb) {
        if self.position.x < bounds.left() {
            self.position.x = bounds.left();
            self.velocity.x = self.velocity.x.max(0.0);
            self.blocked |= Touching::LEFT;
        } else if self.position.x + self.size.x > bounds.right() {
            self.position.x = bounds.right() - self.size.x;
            self.velocity.x = self.velocity.x.min(0.0);
            self.blocked |= Touching::RIGHT;
        }

        if self.position.y < bounds.top() {
            self.position.y = bounds.top();
            self.velocity.y = self.velocity.y.max(0.0);
            self.blocked |= Touching::UP;
        } else if self.position.y + self.size.y > bounds.bottom() {
            self.position.y = bounds.bottom() - self.size.y;
            self.velocity.y = self.velocity.y.min(0.0);
            self.blocked |= Touching::DOWN;
        }
    }
}
