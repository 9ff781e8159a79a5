//! Entity classification: level objects into role buckets.
//!
//! [`classify`] walks a [`LevelDescription`] in authoring order, asks the
//! [`Host`] for one visual per object and files the returned handle under the
//! object's [`Role`]. It also derives the [`WorldBounds`] from the physical
//! objects.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nubium_core::classifier::classify;
//! use nubium_core::entity::Role;
//! use nubium_core::host::{ArcadeHost, Viewport};
//! use nubium_core::level::{LevelDescription, ObjectKind, ObjectSpec};
//! use nubium_core::tuning::PlayerTuning;
//!
//! let level = LevelDescription::new(vec![
//!     ObjectSpec::new(ObjectKind::Player, Vec2::ZERO),
//!     ObjectSpec::new(ObjectKind::Goal, Vec2::new(100.0, 0.0)),
//!     ObjectSpec::new(ObjectKind::Platform, Vec2::new(0.0, 900.0)).with_size(Vec2::new(1200.0, 10.0)),
//! ]);
//! let mut host = ArcadeHost::new(Viewport::new(800.0, 600.0));
//! let classified = classify(&level, &mut host, &PlayerTuning::default()).unwrap();
//!
//! assert_eq!(classified.buckets.members(Role::Platform).len(), 1);
//! assert_eq!(classified.bounds.width, 1200.0);
//! assert_eq!(classified.bounds.height, 910.0);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{EntityHandle, Role};
use crate::error::ConfigurationError;
use crate::host::{Host, LabelAnchor, Texture, Viewport};
use crate::level::{check_singletons, LevelDescription};
use crate::tuning::PlayerTuning;

/// Rectangle anchored at the origin that the player is kept inside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl WorldBounds {
    /// Grows the bounds to cover a rectangle's far corner.
    pub fn cover(&mut self, position: Vec2, size: Vec2) {
        let corner = position + size;
        self.width = self.width.max(corner.x);
        self.height = self.height.max(corner.y);
    }

    /// Grows the bounds to at least the viewport size.
    #[must_use]
    pub fn at_least(self, viewport: Viewport) -> Self {
        Self {
            width: self.width.max(viewport.width),
            height: self.height.max(viewport.height),
        }
    }

    /// Width and height as a vector.
    #[must_use]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Entity handles grouped by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleBuckets {
    /// Solid ground
    pub platforms: Vec<EntityHandle>,
    /// Ground that falls once stepped on
    pub falling_platforms: Vec<EntityHandle>,
    /// Deadly obstacles
    pub hazards: Vec<EntityHandle>,
    /// Sticky surfaces
    pub glue_zones: Vec<EntityHandle>,
    /// Jump boosters
    pub boost_zones: Vec<EntityHandle>,
    /// The player
    pub player: Option<EntityHandle>,
    /// The goal, until reached
    pub goal: Option<EntityHandle>,
    /// Text labels
    pub labels: Vec<EntityHandle>,
}

impl RoleBuckets {
    /// Handles holding a role.
    #[must_use]
    pub fn members(&self, role: Role) -> &[EntityHandle] {
        match role {
            Role::Platform => &self.platforms,
            Role::FallingPlatform => &self.falling_platforms,
            Role::Hazard => &self.hazards,
            Role::Glue => &self.glue_zones,
            Role::Boost => &self.boost_zones,
            Role::Goal => self.goal.as_slice(),
            Role::Player => self.player.as_slice(),
            Role::Label => &self.labels,
        }
    }

    /// Files a handle under a role. A singleton role is replaced.
    pub fn insert(&mut self, role: Role, handle: EntityHandle) {
        match role {
            Role::Platform => self.platforms.push(handle),
            Role::FallingPlatform => self.falling_platforms.push(handle),
            Role::Hazard => self.hazards.push(handle),
            Role::Glue => self.glue_zones.push(handle),
            Role::Boost => self.boost_zones.push(handle),
            Role::Goal => self.goal = Some(handle),
            Role::Player => self.player = Some(handle),
            Role::Label => self.labels.push(handle),
        }
    }

    /// Total number of handles across every role.
    #[must_use]
    pub fn len(&self) -> usize {
        self.platforms.len()
            + self.falling_platforms.len()
            + self.hazards.len()
            + self.glue_zones.len()
            + self.boost_zones.len()
            + usize::from(self.player.is_some())
            + usize::from(self.goal.is_some())
            + self.labels.len()
    }

    /// Whether no role holds a handle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties every bucket and returns the handles that were in them.
    pub fn drain(&mut self) -> Vec<EntityHandle> {
        let taken = std::mem::take(self);
        let mut handles = Vec::with_capacity(taken.len());
        handles.extend(taken.player);
        handles.extend(taken.goal);
        handles.extend(taken.platforms);
        handles.extend(taken.falling_platforms);
        handles.extend(taken.hazards);
        handles.extend(taken.glue_zones);
        handles.extend(taken.boost_zones);
        handles.extend(taken.labels);
        handles
    }
}

/// Result of classifying a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// Handles by role
    pub buckets: RoleBuckets,
    /// Derived world rectangle
    pub bounds: WorldBounds,
}

/// Builds a level into `host` and buckets the resulting handles.
///
/// Physical objects get a sprite at their position, a scale override when
/// they carry a size and a depth override when they carry a depth. Text
/// objects become world-anchored labels and do not count toward the bounds.
/// Once every object exists, the player is made dynamic with the tuned
/// gravity and followed by the camera, and the bounds are applied.
///
/// # Errors
///
/// Returns [`ConfigurationError`] before anything is spawned if the level
/// does not hold exactly one player and one goal.
pub fn classify<H: Host + ?Sized>(
    level: &LevelDescription,
    host: &mut H,
    tuning: &PlayerTuning,
) -> Result<Classified, ConfigurationError> {
    check_singletons(&level.objects)?;

    let mut buckets = RoleBuckets::default();
    let mut bounds = WorldBounds::default();

    for object in &level.objects {
        let role = Role::from_kind(object.kind);
        let Some(texture) = Texture::for_kind(object.kind) else {
            let text = object.text.as_deref().unwrap_or_default();
            let handle = host.spawn_label(text, object.position, LabelAnchor::World);
            buckets.insert(role, handle);
            continue;
        };

        let handle = host.spawn_sprite(texture, object.position);
        bounds.cover(object.position, object.size);
        if object.has_size_override() {
            host.set_scale(handle, object.size);
        }
        if object.has_depth_override() {
            host.set_depth(handle, object.depth);
        }
        buckets.insert(role, handle);
    }

    let bounds = bounds.at_least(host.viewport());
    host.set_world_bounds(bounds.size());
    if let Some(player) = buckets.player {
        host.make_dynamic(player, tuning.gravity);
        host.follow(player);
    }

    debug!(
        entities = buckets.len(),
        platforms = buckets.platforms.len(),
        hazards = buckets.hazards.len(),
        width = bounds.width,
        height = bounds.height,
        "level classified"
    );
    Ok(Classified { buckets, bounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ArcadeHost;
    use crate::level::{ObjectKind, ObjectSpec};

    fn host() -> ArcadeHost {
        ArcadeHost::new(Viewport::new(800.0, 600.0))
    }

    fn mixed_level() -> LevelDescription {
        LevelDescription::new(vec![
            ObjectSpec::text(Vec2::new(5000.0, 5000.0), "far away"),
            ObjectSpec::new(ObjectKind::Player, Vec2::ZERO),
            ObjectSpec::new(ObjectKind::Platform, Vec2::new(0.0, 20.0))
                .with_size(Vec2::new(200.0, 10.0)),
            ObjectSpec::new(ObjectKind::Platform, Vec2::new(300.0, 20.0))
                .with_size(Vec2::new(100.0, 10.0))
                .with_depth(3.0),
            ObjectSpec::new(ObjectKind::PlatformFall, Vec2::new(400.0, 20.0))
                .with_size(Vec2::new(50.0, 10.0)),
            ObjectSpec::new(ObjectKind::Damage, Vec2::new(500.0, 50.0))
                .with_size(Vec2::new(10.0, 10.0)),
            ObjectSpec::new(ObjectKind::Glue, Vec2::new(600.0, 20.0))
                .with_size(Vec2::new(10.0, 10.0)),
            ObjectSpec::new(ObjectKind::Extrajump, Vec2::new(700.0, 20.0))
                .with_size(Vec2::new(10.0, 10.0)),
            ObjectSpec::new(ObjectKind::Goal, Vec2::new(100.0, 0.0))
                .with_size(Vec2::new(10.0, 10.0)),
        ])
    }

    mod bucket_tests {
        use super::*;

        #[test]
        fn every_object_lands_in_its_bucket() {
            let mut host = host();
            let classified = classify(&mixed_level(), &mut host, &PlayerTuning::default()).unwrap();
            let buckets = &classified.buckets;

            assert_eq!(buckets.members(Role::Label).len(), 1);
            assert_eq!(buckets.members(Role::Platform).len(), 2);
            assert_eq!(buckets.members(Role::FallingPlatform).len(), 1);
            assert_eq!(buckets.members(Role::Hazard).len(), 1);
            assert_eq!(buckets.members(Role::Glue).len(), 1);
            assert_eq!(buckets.members(Role::Boost).len(), 1);
            assert!(buckets.player.is_some());
            assert!(buckets.goal.is_some());
            assert_eq!(buckets.len(), 9);
            assert_eq!(host.sprite_count(), 8);
        }

        #[test]
        fn size_and_depth_overrides_only_when_set() {
            let mut host = host();
            let classified = classify(&mixed_level(), &mut host, &PlayerTuning::default()).unwrap();
            let buckets = &classified.buckets;

            let player = buckets.player.unwrap();
            assert_eq!(host.body(player).unwrap().size, Vec2::new(24.0, 20.0));
            assert_eq!(host.depth(player), None);

            let [first, second] = buckets.platforms[..] else {
                panic!("expected two platforms");
            };
            assert_eq!(host.body(first).unwrap().size, Vec2::new(200.0, 10.0));
            assert_eq!(host.depth(first), None);
            assert_eq!(host.depth(second), Some(3.0));
        }

        #[test]
        fn player_is_the_only_dynamic_body() {
            let mut host = host();
            let classified = classify(&mixed_level(), &mut host, &PlayerTuning::default()).unwrap();
            let player = classified.buckets.player.unwrap();

            let body = host.body(player).unwrap();
            assert!(!body.immovable);
            assert!(body.collide_world_bounds);
            assert_eq!(body.gravity, Vec2::new(0.0, 1000.0));
            for handle in &classified.buckets.platforms {
                assert!(host.body(*handle).unwrap().immovable);
            }
        }

        #[test]
        fn drain_returns_every_handle() {
            let mut host = host();
            let mut buckets = classify(&mixed_level(), &mut host, &PlayerTuning::default())
                .unwrap()
                .buckets;
            let handles = buckets.drain();
            assert_eq!(handles.len(), 9);
            assert!(buckets.is_empty());
            assert!(buckets.members(Role::Player).is_empty());
        }
    }

    mod bounds_tests {
        use super::*;

        #[test]
        fn labels_do_not_grow_bounds() {
            let mut host = host();
            let classified = classify(&mixed_level(), &mut host, &PlayerTuning::default()).unwrap();
            assert_eq!(classified.bounds, WorldBounds { width: 800.0, height: 600.0 });
            assert_eq!(host.world_bounds(), Vec2::new(800.0, 600.0));
        }

        #[test]
        fn large_level_exceeds_viewport() {
            let level = LevelDescription::new(vec![
                ObjectSpec::new(ObjectKind::Player, Vec2::ZERO),
                ObjectSpec::new(ObjectKind::Goal, Vec2::new(1500.0, 100.0))
                    .with_size(Vec2::new(10.0, 10.0)),
                ObjectSpec::new(ObjectKind::Platform, Vec2::new(0.0, 700.0))
                    .with_size(Vec2::new(100.0, 10.0)),
            ]);
            let mut host = host();
            let classified = classify(&level, &mut host, &PlayerTuning::default()).unwrap();
            assert_eq!(classified.bounds, WorldBounds { width: 1510.0, height: 710.0 });
        }

        #[test]
        fn unsized_objects_count_by_position() {
            let mut bounds = WorldBounds::default();
            bounds.cover(Vec2::new(30.0, 40.0), Vec2::ZERO);
            assert_eq!(bounds, WorldBounds { width: 30.0, height: 40.0 });
        }
    }

    mod configuration_tests {
        use super::*;

        #[test]
        fn missing_player_spawns_nothing() {
            let level = LevelDescription::new(vec![ObjectSpec::new(ObjectKind::Goal, Vec2::ZERO)]);
            let mut host = host();
            let err = classify(&level, &mut host, &PlayerTuning::default()).unwrap_err();
            assert_eq!(err, ConfigurationError::MissingSingleton(ObjectKind::Player));
            assert_eq!(host.sprite_count(), 0);
        }

        #[test]
        fn duplicate_goal_is_rejected() {
            let level = LevelDescription::new(vec![
                ObjectSpec::new(ObjectKind::Player, Vec2::ZERO),
                ObjectSpec::new(ObjectKind::Goal, Vec2::ZERO),
                ObjectSpec::new(ObjectKind::Goal, Vec2::ONE),
            ]);
            let mut host = host();
            let err = classify(&level, &mut host, &PlayerTuning::default()).unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::DuplicateSingleton {
                    kind: ObjectKind::Goal,
                    count: 2
                }
            );
        }
    }
}
