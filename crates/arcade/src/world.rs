//! World: top-level container for bodies.
//!
//! The World owns every body, the rectangle bodies may be clamped into, and
//! the step counter. Bodies live in a `BTreeMap` so integration visits them
//! in spawn order on every platform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::body::{Body, BodyId};
use crate::separate::separate;
use crate::Aabb;

/// Container for all bodies in a physics scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Monotonically increasing body ID counter
    next_id: u64,
    /// Body storage with deterministic iteration order
    bodies: BTreeMap<BodyId, Body>,
    /// Rectangle that `collide_world_bounds` bodies are kept inside
    bounds: Aabb,
    /// Number of completed steps
    tick: u64,
}

impl World {
    /// Create an empty world with the given bounds.
    #[must_use]
    pub fn new(bounds: Aabb) -> Self {
        Self {
            next_id: 0,
            bodies: BTreeMap::new(),
            bounds,
            tick: 0,
        }
    }

    /// Adds a body and returns its new ID.
    pub fn spawn(&mut self, body: Body) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, body);
        id
    }

    /// Removes a body, returning it if it existed.
    pub fn despawn(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    /// Removes every body. IDs keep counting up.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Returns a reference to a body.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Returns a mutable reference to a body.
    #[must_use]
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// Number of live bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterates bodies in spawn order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies.iter().map(|(id, body)| (*id, body))
    }

    /// World bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Replaces the world bounds.
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advances every body by `dt` seconds.
    ///
    /// Contact flags are cleared, velocities and positions integrated, and
    /// bodies with `collide_world_bounds` clamped back inside the bounds.
    pub fn step(&mut self, dt: f32) {
        let bounds = self.bounds;
        for body in self.bodies.values_mut() {
            body.integrate(dt);
            if body.collide_world_bounds {
                body.clamp_to(&bounds);
            }
        }
        self.tick += 1;
    }

    /// Tests two bodies for contact and separates them.
    ///
    /// Returns `true` if the bodies were touching. Missing IDs and a body
    /// collided with itself report no contact.
    pub fn collide(&mut self, a: BodyId, b: BodyId) -> bool {
        if a == b || !self.bodies.contains_key(&a) || !self.bodies.contains_key(&b) {
            return false;
        }
        let (Some(mut body_a), Some(mut body_b)) = (self.bodies.remove(&a), self.bodies.remove(&b))
        else {
            return false;
        };

        let hit = separate(&mut body_a, &mut body_b);
        if hit {
            trace!(%a, %b, tick = self.tick, "contact");
        }

        self.bodies.insert(a, body_a);
        self.bodies.insert(b, body_b);
        hit
    }
}
