//! Entity handles and gameplay roles.
//!
//! - [`EntityHandle`]: opaque identifier the host hands out for every visual
//! - [`Role`]: which bucket an entity belongs to, and therefore which
//!   collision response applies to it

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level::ObjectKind;

/// Opaque identifier for a host-side entity (sprite or label).
///
/// Handles are assigned by the [`Host`](crate::host::Host) in increasing
/// order and never reused, so a handle from a torn-down level can never
/// alias an entity of the rebuilt one.
///
/// # Example
///
/// ```
/// use nubium_core::entity::EntityHandle;
///
/// let a = EntityHandle::new(1);
/// let b = EntityHandle::new(2);
/// assert!(a < b);
/// assert_eq!(a.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityHandle({})", self.0)
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityHandle {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Gameplay role of an entity.
///
/// Every level object maps to exactly one role. The role decides the bucket
/// the entity is stored in and the collision response it triggers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Solid, immovable ground
    Platform,
    /// Solid ground that drops away once stepped on
    FallingPlatform,
    /// Kills the player on contact
    Hazard,
    /// Stops vertical motion and opens a short low-jump window
    Glue,
    /// Arms a higher jump for the current frame
    Boost,
    /// Completes the level
    Goal,
    /// The controllable character
    Player,
    /// Non-physical text
    Label,
}

impl Role {
    /// Role for an authored object kind.
    #[must_use]
    pub const fn from_kind(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Text => Self::Label,
            ObjectKind::Player => Self::Player,
            ObjectKind::Platform => Self::Platform,
            ObjectKind::PlatformFall => Self::FallingPlatform,
            ObjectKind::Damage => Self::Hazard,
            ObjectKind::Glue => Self::Glue,
            ObjectKind::Extrajump => Self::Boost,
            ObjectKind::Goal => Self::Goal,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform => write!(f, "Platform"),
            Self::FallingPlatform => write!(f, "FallingPlatform"),
            Self::Hazard => write!(f, "Hazard"),
            Self::Glue => write!(f, "Glue"),
            Self::Boost => write!(f, "Boost"),
            Self::Goal => write!(f, "Goal"),
            Self::Player => write!(f, "Player"),
            Self::Label => write!(f, "Label"),
        }
    }
}
