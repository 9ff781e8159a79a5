//! [`Host`] implementation over the `arcade` physics world.

use std::collections::BTreeMap;

use arcade::{Aabb, Body, BodyId, World};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Host, LabelAnchor, Texture, Viewport};
use crate::entity::EntityHandle;

/// Native pixel sizes of the textures.
///
/// The player spritesheet has 24×20 frames and the controller button is
/// 68×68. Every level texture is a single pixel, so a scale override reads
/// directly as a size in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureAtlas {
    sizes: BTreeMap<Texture, Vec2>,
}

impl Default for TextureAtlas {
    fn default() -> Self {
        let mut sizes = BTreeMap::new();
        sizes.insert(Texture::Player, Vec2::new(24.0, 20.0));
        sizes.insert(Texture::VgcButton, Vec2::splat(68.0));
        Self { sizes }
    }
}

impl TextureAtlas {
    /// Overrides a texture's native size, builder style.
    #[must_use]
    pub fn with_size(mut self, texture: Texture, size: Vec2) -> Self {
        self.sizes.insert(texture, size);
        self
    }

    /// Native size of a texture. Unlisted textures are 1×1.
    #[must_use]
    pub fn native_size(&self, texture: Texture) -> Vec2 {
        self.sizes.get(&texture).copied().unwrap_or(Vec2::ONE)
    }
}

/// A drawn image backed by a physical body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Image
    pub texture: Texture,
    /// Physical body in the world
    pub body: BodyId,
    /// Multiplier on the native size
    pub scale: Vec2,
    /// Draw-order override
    pub depth: Option<f32>,
    /// Spritesheet frame
    pub frame: u32,
}

/// A screen-fixed image with no body, such as a controller button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Image
    pub texture: Texture,
    /// Top-left corner in viewport coordinates
    pub position: Vec2,
    /// Multiplier on the native size
    pub scale: Vec2,
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Displayed text
    pub text: String,
    /// Position, interpreted according to `anchor`
    pub position: Vec2,
    /// World or viewport anchoring
    pub anchor: LabelAnchor,
}

/// Headless host: an `arcade` world plus sprite, label and camera bookkeeping.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use nubium_core::host::{ArcadeHost, Host, Texture, Viewport};
///
/// let mut host = ArcadeHost::new(Viewport::new(800.0, 600.0));
/// let player = host.spawn_sprite(Texture::Player, Vec2::ZERO);
/// host.make_dynamic(player, 1000.0);
/// host.step(1.0 / 60.0);
/// assert!(host.velocity(player).unwrap().y > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ArcadeHost {
    world: World,
    atlas: TextureAtlas,
    viewport: Viewport,
    sprites: BTreeMap<EntityHandle, Sprite>,
    overlays: BTreeMap<EntityHandle, Overlay>,
    labels: BTreeMap<EntityHandle, Label>,
    follow: Option<EntityHandle>,
    next_handle: u64,
}

impl ArcadeHost {
    /// Creates a host with the default atlas. The world starts
    /// viewport-sized.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_atlas(viewport, TextureAtlas::default())
    }

    /// Creates a host with a custom atlas.
    #[must_use]
    pub fn with_atlas(viewport: Viewport, atlas: TextureAtlas) -> Self {
        Self {
            world: World::new(Aabb::new(Vec2::ZERO, viewport.size())),
            atlas,
            viewport,
            sprites: BTreeMap::new(),
            overlays: BTreeMap::new(),
            labels: BTreeMap::new(),
            follow: None,
            next_handle: 0,
        }
    }

    /// Underlying physics world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Texture sizes.
    #[must_use]
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// A sprite's state.
    #[must_use]
    pub fn sprite(&self, handle: EntityHandle) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    /// A sprite's body.
    #[must_use]
    pub fn body(&self, handle: EntityHandle) -> Option<&Body> {
        self.sprites
            .get(&handle)
            .and_then(|sprite| self.world.get(sprite.body))
    }

    /// Top-left corner of a sprite.
    #[must_use]
    pub fn position(&self, handle: EntityHandle) -> Option<Vec2> {
        self.body(handle).map(|body| body.position)
    }

    /// Current spritesheet frame.
    #[must_use]
    pub fn sprite_frame(&self, handle: EntityHandle) -> Option<u32> {
        self.sprites.get(&handle).map(|sprite| sprite.frame)
    }

    /// Draw-order override.
    #[must_use]
    pub fn depth(&self, handle: EntityHandle) -> Option<f32> {
        self.sprites.get(&handle).and_then(|sprite| sprite.depth)
    }

    /// Number of live sprites.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// An overlay's state.
    #[must_use]
    pub fn overlay(&self, handle: EntityHandle) -> Option<&Overlay> {
        self.overlays.get(&handle)
    }

    /// Screen rectangle covered by an overlay.
    #[must_use]
    pub fn overlay_area(&self, handle: EntityHandle) -> Option<Aabb> {
        self.overlays.get(&handle).map(|overlay| {
            Aabb::new(
                overlay.position,
                self.atlas.native_size(overlay.texture) * overlay.scale,
            )
        })
    }

    /// Number of live overlays.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// A label's state.
    #[must_use]
    pub fn label(&self, handle: EntityHandle) -> Option<&Label> {
        self.labels.get(&handle)
    }

    /// Labels in creation order.
    pub fn labels(&self) -> impl Iterator<Item = (EntityHandle, &Label)> + '_ {
        self.labels.iter().map(|(handle, label)| (*handle, label))
    }

    /// Top-left corner of the visible world region.
    ///
    /// The camera centers on the followed sprite and stops at the world
    /// edges. Without a target it stays at the origin.
    #[must_use]
    pub fn camera(&self) -> Vec2 {
        let Some(target) = self.follow.and_then(|handle| self.body(handle)) else {
            return Vec2::ZERO;
        };
        let max = (self.world.bounds().size - self.viewport.size()).max(Vec2::ZERO);
        (target.aabb().center() - self.viewport.center()).clamp(Vec2::ZERO, max)
    }

    fn allocate(&mut self) -> EntityHandle {
        let handle = EntityHandle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn body_mut(&mut self, handle: EntityHandle) -> Option<&mut Body> {
        let id = self.sprites.get(&handle)?.body;
        self.world.get_mut(id)
    }
}

impl Host for ArcadeHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn spawn_sprite(&mut self, texture: Texture, position: Vec2) -> EntityHandle {
        let size = self.atlas.native_size(texture);
        let body = self.world.spawn(Body::immovable(position, size));
        let handle = self.allocate();
        self.sprites.insert(
            handle,
            Sprite {
                texture,
                body,
                scale: Vec2::ONE,
                depth: None,
                frame: 0,
            },
        );
        trace!(%handle, texture = texture.key(), ?position, "sprite spawned");
        handle
    }

    fn set_scale(&mut self, handle: EntityHandle, scale: Vec2) {
        let Some(sprite) = self.sprites.get_mut(&handle) else {
            return;
        };
        sprite.scale = scale;
        let size = self.atlas.native_size(sprite.texture) * scale;
        if let Some(body) = self.world.get_mut(sprite.body) {
            body.size = size;
        }
    }

    fn set_depth(&mut self, handle: EntityHandle, depth: f32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.depth = Some(depth);
        }
    }

    fn make_dynamic(&mut self, handle: EntityHandle, gravity: f32) {
        if let Some(body) = self.body_mut(handle) {
            body.immovable = false;
            body.gravity = Vec2::new(0.0, gravity);
            body.collide_world_bounds = true;
        }
    }

    fn spawn_overlay(&mut self, texture: Texture, position: Vec2, scale: Vec2) -> EntityHandle {
        let handle = self.allocate();
        self.overlays.insert(
            handle,
            Overlay {
                texture,
                position,
                scale,
            },
        );
        trace!(%handle, texture = texture.key(), ?position, "overlay spawned");
        handle
    }

    fn spawn_label(&mut self, text: &str, position: Vec2, anchor: LabelAnchor) -> EntityHandle {
        let handle = self.allocate();
        self.labels.insert(
            handle,
            Label {
                text: text.to_string(),
                position,
                anchor,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: EntityHandle) -> bool {
        if let Some(sprite) = self.sprites.remove(&handle) {
            self.world.despawn(sprite.body);
            if self.follow == Some(handle) {
                self.follow = None;
            }
            return true;
        }
        self.overlays.remove(&handle).is_some() || self.labels.remove(&handle).is_some()
    }

    fn exists(&self, handle: EntityHandle) -> bool {
        self.sprites.contains_key(&handle)
            || self.overlays.contains_key(&handle)
            || self.labels.contains_key(&handle)
    }

    fn set_world_bounds(&mut self, size: Vec2) {
        self.world.set_bounds(Aabb::new(Vec2::ZERO, size));
    }

    fn world_bounds(&self) -> Vec2 {
        self.world.bounds().size
    }

    fn follow(&mut self, handle: EntityHandle) {
        if self.sprites.contains_key(&handle) {
            self.follow = Some(handle);
        }
    }

    fn step(&mut self, dt: f32) {
        self.world.step(dt);
    }

    fn collide(&mut self, a: EntityHandle, b: EntityHandle) -> bool {
        match (self.sprites.get(&a), self.sprites.get(&b)) {
            (Some(sprite_a), Some(sprite_b)) => self.world.collide(sprite_a.body, sprite_b.body),
            _ => false,
        }
    }

    fn velocity(&self, handle: EntityHandle) -> Option<Vec2> {
        self.body(handle).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2) {
        if let Some(body) = self.body_mut(handle) {
            body.velocity = velocity;
        }
    }

    fn is_grounded(&self, handle: EntityHandle) -> bool {
        self.body(handle).is_some_and(Body::is_grounded)
    }

    fn set_frame(&mut self, handle: EntityHandle, frame: u32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.frame = frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn host() -> ArcadeHost {
        ArcadeHost::new(Viewport::new(800.0, 600.0))
    }

    mod sprite_tests {
        use super::*;

        #[test]
        fn native_sizes() {
            let mut host = host();
            let player = host.spawn_sprite(Texture::Player, Vec2::ZERO);
            let platform = host.spawn_sprite(Texture::Platform, Vec2::ZERO);
            assert_eq!(host.body(player).unwrap().size, Vec2::new(24.0, 20.0));
            assert_eq!(host.body(platform).unwrap().size, Vec2::ONE);
            assert!(host.body(platform).unwrap().immovable);
        }

        #[test]
        fn scale_multiplies_native_size() {
            let mut host = host();
            let platform = host.spawn_sprite(Texture::Platform, Vec2::ZERO);
            host.set_scale(platform, Vec2::new(200.0, 10.0));
            assert_eq!(host.body(platform).unwrap().size, Vec2::new(200.0, 10.0));

            let player = host.spawn_sprite(Texture::Player, Vec2::ZERO);
            host.set_scale(player, Vec2::splat(2.0));
            assert_eq!(host.body(player).unwrap().size, Vec2::new(48.0, 40.0));
        }

        #[test]
        fn handles_are_never_reused() {
            let mut host = host();
            let a = host.spawn_sprite(Texture::Goal, Vec2::ZERO);
            assert!(host.destroy(a));
            let b = host.spawn_sprite(Texture::Goal, Vec2::ZERO);
            assert!(b > a);
            assert!(!host.exists(a));
            assert!(!host.destroy(a));
            assert_eq!(host.world().body_count(), 1);
        }

        #[test]
        fn operations_on_destroyed_handle_are_noops() {
            let mut host = host();
            let a = host.spawn_sprite(Texture::Player, Vec2::ZERO);
            host.destroy(a);
            host.set_velocity(a, Vec2::ONE);
            host.set_frame(a, 3);
            host.make_dynamic(a, 1000.0);
            assert_eq!(host.velocity(a), None);
            assert!(!host.is_grounded(a));
        }

        #[test]
        fn depth_and_frame() {
            let mut host = host();
            let a = host.spawn_sprite(Texture::Player, Vec2::ZERO);
            assert_eq!(host.depth(a), None);
            host.set_depth(a, 2.0);
            host.set_frame(a, 4);
            assert_eq!(host.depth(a), Some(2.0));
            assert_eq!(host.sprite_frame(a), Some(4));
        }
    }

    mod physics_tests {
        use super::*;

        #[test]
        fn dynamic_sprite_lands_on_platform() {
            let mut host = host();
            let player = host.spawn_sprite(Texture::Player, Vec2::ZERO);
            host.make_dynamic(player, 1000.0);
            let floor = host.spawn_sprite(Texture::Platform, Vec2::new(0.0, 20.0));
            host.set_scale(floor, Vec2::new(200.0, 10.0));

            host.step(DT);
            assert!(host.collide(player, floor));
            assert!(host.is_grounded(player));
            assert_eq!(host.velocity(player).unwrap().y, 0.0);
        }

        #[test]
        fn dynamic_sprite_is_clamped_to_world_bounds() {
            let mut host = host();
            host.set_world_bounds(Vec2::new(100.0, 100.0));
            let player = host.spawn_sprite(Texture::Player, Vec2::new(0.0, 70.0));
            host.make_dynamic(player, 1000.0);
            for _ in 0..60 {
                host.step(DT);
            }
            assert_eq!(host.position(player).unwrap().y, 80.0);
            assert!(host.is_grounded(player));
        }

        #[test]
        fn immovable_sprite_ignores_gravity() {
            let mut host = host();
            let goal = host.spawn_sprite(Texture::Goal, Vec2::new(5.0, 5.0));
            host.step(DT);
            assert_eq!(host.position(goal), Some(Vec2::new(5.0, 5.0)));
        }
    }

    mod camera_tests {
        use super::*;

        #[test]
        fn camera_centers_and_clamps() {
            let mut host = host();
            host.set_world_bounds(Vec2::new(2000.0, 600.0));
            let player = host.spawn_sprite(Texture::Player, Vec2::new(1000.0, 300.0));
            assert_eq!(host.camera(), Vec2::ZERO);

            host.follow(player);
            assert_eq!(host.camera(), Vec2::new(612.0, 0.0));

            let far = host.spawn_sprite(Texture::Player, Vec2::new(1990.0, 0.0));
            host.follow(far);
            assert_eq!(host.camera(), Vec2::new(1200.0, 0.0));

            host.destroy(far);
            assert_eq!(host.camera(), Vec2::ZERO);
        }

        #[test]
        fn resize_keeps_world_bounds() {
            let mut host = host();
            host.set_world_bounds(Vec2::new(900.0, 700.0));
            host.resize(Viewport::new(1024.0, 768.0));
            assert_eq!(host.viewport(), Viewport::new(1024.0, 768.0));
            assert_eq!(host.world_bounds(), Vec2::new(900.0, 700.0));
        }
    }

    #[test]
    fn overlays_are_screen_fixed_and_bodiless() {
        let mut host = host();
        let button =
            host.spawn_overlay(Texture::VgcButton, Vec2::new(0.0, 532.0), Vec2::new(1.5, 1.0));
        assert!(host.exists(button));
        assert_eq!(host.world().body_count(), 0);
        assert_eq!(host.sprite_count(), 0);
        assert_eq!(
            host.overlay_area(button),
            Some(Aabb::new(Vec2::new(0.0, 532.0), Vec2::new(102.0, 68.0)))
        );

        host.set_velocity(button, Vec2::ONE);
        assert_eq!(host.velocity(button), None);
        assert!(host.destroy(button));
        assert_eq!(host.overlay_count(), 0);
    }

    #[test]
    fn labels_are_not_physical() {
        let mut host = host();
        let label = host.spawn_label("hello", Vec2::new(10.0, 20.0), LabelAnchor::World);
        assert!(host.exists(label));
        assert_eq!(host.world().body_count(), 0);
        assert_eq!(host.label(label).unwrap().text, "hello");
        assert_eq!(host.labels().count(), 1);
        assert!(host.destroy(label));
        assert_eq!(host.labels().count(), 0);
    }
}
