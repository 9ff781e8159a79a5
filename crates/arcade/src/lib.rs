//! # Arcade
//!
//! Deterministic arcade physics substrate for 2D platformers.
//!
//! Arcade stores axis-aligned bodies in a [`World`] and provides the two
//! primitives a platformer loop needs:
//!
//! - **Integration**: gravity and velocity applied with a fixed timestep,
//!   bodies optionally clamped to the world bounds
//! - **Separation**: [`World::collide`] pushes overlapping bodies apart,
//!   zeroes the offending velocity and records which faces are touching
//!
//! Coordinates are screen-style: the origin is the top-left corner of the
//! world and `y` grows downward, so gravity is a positive `y` acceleration.
//!
//! ## Quick Start
//!
//! ```
//! use arcade::{Aabb, Body, World};
//! use glam::Vec2;
//!
//! let mut world = World::new(Aabb::new(Vec2::ZERO, Vec2::new(800.0, 600.0)));
//!
//! let floor = world.spawn(Body::immovable(Vec2::new(0.0, 100.0), Vec2::new(200.0, 10.0)));
//! let crate_ = world.spawn(
//!     Body::dynamic(Vec2::new(10.0, 70.0), Vec2::new(20.0, 20.0)).with_gravity(Vec2::new(0.0, 1000.0)),
//! );
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0);
//!     world.collide(crate_, floor);
//! }
//!
//! assert!(world.get(crate_).unwrap().is_grounded());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod separate;
pub mod world;

// Re-exports for convenience
pub use body::{Body, BodyId, Touching};
pub use world::World;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    /// Create a box from its top-left corner and size.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.position.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.position.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    /// Get the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Check if a point is inside the box (edges included).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Check if two boxes share a region of non-zero area.
    ///
    /// Boxes that merely touch along an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Check if the horizontal extents intersect.
    #[must_use]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Check if the vertical extents intersect.
    #[must_use]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }
}
