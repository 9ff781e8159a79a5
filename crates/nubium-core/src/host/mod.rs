//! Render and physics host abstraction.
//!
//! The core never touches sprites or bodies directly. It drives a [`Host`],
//! which hands out [`EntityHandle`]s for visuals, owns their physical bodies
//! and answers collision and velocity queries.
//!
//! # Architecture
//!
//! ```text
//! Session ──► Classifier ──► Host::spawn_sprite / spawn_label
//!    │
//!    ├──► Host::step(dt)
//!    ├──► Resolver ──► Host::collide(player, member)
//!    └──► Player   ──► Host::velocity / set_velocity / set_frame
//! ```
//!
//! [`ArcadeHost`] implements the trait over the `arcade` physics world.

mod arcade_host;

pub use self::arcade_host::{ArcadeHost, Label, Overlay, Sprite, TextureAtlas};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::EntityHandle;
use crate::level::ObjectKind;

/// Size of the presentation surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width and height as a vector.
    #[must_use]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Center of the surface.
    #[must_use]
    pub fn center(self) -> Vec2 {
        self.size() * 0.5
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Sprite images the host knows how to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Texture {
    /// Player spritesheet (idle, run right, run left, rising, falling)
    Player,
    /// Solid platform
    Platform,
    /// Falling platform
    PlatformFall,
    /// Hazard
    Damage,
    /// Glue zone
    Glue,
    /// Boost zone
    Extrajump,
    /// Level exit
    Goal,
    /// On-screen controller button
    VgcButton,
}

impl Texture {
    /// Asset key of the texture.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Platform => "platform",
            Self::PlatformFall => "platform_fall",
            Self::Damage => "damage",
            Self::Glue => "glue",
            Self::Extrajump => "extrajump",
            Self::Goal => "goal",
            Self::VgcButton => "vgc_button",
        }
    }

    /// Texture for a physical object kind. Text has none.
    #[must_use]
    pub const fn for_kind(kind: ObjectKind) -> Option<Self> {
        match kind {
            ObjectKind::Text => None,
            ObjectKind::Player => Some(Self::Player),
            ObjectKind::Platform => Some(Self::Platform),
            ObjectKind::PlatformFall => Some(Self::PlatformFall),
            ObjectKind::Damage => Some(Self::Damage),
            ObjectKind::Glue => Some(Self::Glue),
            ObjectKind::Extrajump => Some(Self::Extrajump),
            ObjectKind::Goal => Some(Self::Goal),
        }
    }
}

/// What a label's position is relative to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    /// World coordinates; scrolls with the camera
    World,
    /// Viewport coordinates, centered on the position; fixed on screen
    Viewport,
}

/// Render and physics capabilities the core consumes.
///
/// Sprites are created with an immovable body of their texture's native
/// size. Operations on a handle that no longer exists are no-ops.
pub trait Host {
    /// Current presentation surface size.
    fn viewport(&self) -> Viewport;

    /// Resizes the presentation surface only.
    fn resize(&mut self, viewport: Viewport);

    /// Creates a sprite with an immovable body, top-left at `position`.
    fn spawn_sprite(&mut self, texture: Texture, position: Vec2) -> EntityHandle;

    /// Multiplies the sprite's native size by `scale`, body included.
    fn set_scale(&mut self, handle: EntityHandle, scale: Vec2);

    /// Overrides the sprite's draw order.
    fn set_depth(&mut self, handle: EntityHandle, depth: f32);

    /// Turns the sprite's body dynamic, with downward `gravity` and clamped
    /// to the world bounds.
    fn make_dynamic(&mut self, handle: EntityHandle, gravity: f32);

    /// Creates a non-physical sprite fixed to the viewport, top-left at
    /// `position` in screen coordinates and `scale` times its native size.
    fn spawn_overlay(&mut self, texture: Texture, position: Vec2, scale: Vec2) -> EntityHandle;

    /// Creates a non-physical text label.
    fn spawn_label(&mut self, text: &str, position: Vec2, anchor: LabelAnchor) -> EntityHandle;

    /// Destroys a sprite, overlay or label. Returns whether it existed.
    fn destroy(&mut self, handle: EntityHandle) -> bool;

    /// Whether a sprite, overlay or label exists.
    fn exists(&self, handle: EntityHandle) -> bool;

    /// Sets the world rectangle, anchored at the origin.
    fn set_world_bounds(&mut self, size: Vec2);

    /// Size of the world rectangle.
    fn world_bounds(&self) -> Vec2;

    /// Locks the camera onto a sprite.
    fn follow(&mut self, handle: EntityHandle);

    /// Integrates every body by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Separates two sprites' bodies. Returns whether they touched.
    fn collide(&mut self, a: EntityHandle, b: EntityHandle) -> bool;

    /// Body velocity, if the sprite exists.
    fn velocity(&self, handle: EntityHandle) -> Option<Vec2>;

    /// Sets a body's velocity.
    fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2);

    /// Whether the body rests on the world floor or on another body.
    fn is_grounded(&self, handle: EntityHandle) -> bool;

    /// Selects a spritesheet frame.
    fn set_frame(&mut self, handle: EntityHandle, frame: u32);
}
