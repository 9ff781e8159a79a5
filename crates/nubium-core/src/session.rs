//! Session controller: one playthrough of one level.
//!
//! The session owns the host, the store and a [`SessionState`], and drives
//! the per-frame protocol:
//!
//! 1. Integrate every body ([`Host::step`])
//! 2. Resolve collisions in table order ([`collision::resolve`])
//! 3. Apply terminal contacts: the goal wins, then a hazard kills
//! 4. Run the player state machine and write the velocity and pose back
//!
//! # State machine
//!
//! ```text
//! Playing ──goal──► Won (terminal)
//!    ▲  │
//!    └──┘ hazard: full teardown and rebuild
//! ```
//!
//! A death destroys every entity of the level and rebuilds it from the
//! original [`LevelDescription`]; nothing carries over. A win shows a
//! viewport-anchored victory label, removes the goal and, for stored levels,
//! marks the level completed. A failed completion write is queued as a
//! notice and the game goes on.
//!
//! The on-screen controller buttons belong to the session, not the level:
//! they are spawned once at launch and outlive every rebuild.

use glam::Vec2;
use tracing::{info, warn};

use crate::classifier::{classify, RoleBuckets, WorldBounds};
use crate::collision;
use crate::config::SessionConfig;
use crate::entity::EntityHandle;
use crate::error::{ConfigurationError, PersistenceFailure, SessionError};
use crate::host::{Host, LabelAnchor, Texture, Viewport};
use crate::input::{ButtonId, Intents, VirtualController, BUTTON_SIZE};
use crate::launch::{LaunchParams, LevelSource};
use crate::level::LevelDescription;
use crate::player::{self, PlayerState};
use crate::store::{mark_completed, KeyValueStore};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The level is being played
    Playing,
    /// The goal was reached
    Won,
}

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing terminal happened
    Continued,
    /// The player died and the level was rebuilt
    Died,
    /// The player reached the goal this frame
    Won,
}

/// Everything that belongs to the current build of the level.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Entity handles by role
    pub buckets: RoleBuckets,
    /// World rectangle of this build
    pub bounds: WorldBounds,
    /// Player ability state
    pub player: PlayerState,
    /// Lifecycle phase
    pub phase: Phase,
    /// Frames simulated since launch
    pub frame: u64,
    /// Deaths since launch
    pub deaths: u32,
}

/// A running level.
///
/// # Example
///
/// ```
/// use nubium_core::config::SessionConfig;
/// use nubium_core::host::{ArcadeHost, Viewport};
/// use nubium_core::input::Intents;
/// use nubium_core::launch::LaunchParams;
/// use nubium_core::session::{Phase, Session};
/// use nubium_core::store::{MemoryStore, LEVELS_KEY};
///
/// let store = MemoryStore::new().with_entry(
///     LEVELS_KEY,
///     r#"[{"objects":[
///         {"type":"player","position":[0,0]},
///         {"type":"goal","position":[100,0],"size":[10,10]},
///         {"type":"platform","position":[0,20],"size":[200,10]}
///     ]}]"#,
/// );
/// let config = SessionConfig::default();
/// let host = ArcadeHost::new(config.viewport);
/// let mut session = Session::launch(&LaunchParams::stored(0), store, host, config).unwrap();
///
/// for _ in 0..60 {
///     session.frame(Intents::RIGHT).unwrap();
/// }
/// assert_eq!(session.phase(), Phase::Won);
/// ```
#[derive(Debug)]
pub struct Session<H: Host, S: KeyValueStore> {
    host: H,
    store: S,
    level: LevelDescription,
    source: LevelSource,
    config: SessionConfig,
    state: SessionState,
    victory_label: Option<EntityHandle>,
    controls: [(ButtonId, EntityHandle); 3],
    notices: Vec<PersistenceFailure>,
}

impl<H: Host, S: KeyValueStore> Session<H, S> {
    /// Selects the source from `params`, loads the level and builds it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Launch`] for bad parameters, [`SessionError::Load`]
    /// when the level cannot be read and [`SessionError::Configuration`] when
    /// it cannot be built.
    pub fn launch(
        params: &LaunchParams,
        store: S,
        host: H,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let source = params.source()?;
        let level = source.load(&store)?;
        let session = Self::new(level, source, store, host, config)?;
        info!(?source, objects = session.level.objects.len(), "session launched");
        Ok(session)
    }

    /// Builds an already loaded level.
    ///
    /// # Errors
    ///
    /// [`SessionError::Settings`] if `config` has an unusable timestep or
    /// viewport, and [`SessionError::Configuration`] if the level does not
    /// hold exactly one player and one goal.
    pub fn new(
        level: LevelDescription,
        source: LevelSource,
        store: S,
        mut host: H,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        host.resize(config.viewport);
        let classified = classify(&level, &mut host, &config.tuning)?;
        let controls = spawn_controls(&mut host, config.viewport);
        Ok(Self {
            host,
            store,
            level,
            source,
            config,
            state: SessionState {
                buckets: classified.buckets,
                bounds: classified.bounds,
                player: PlayerState::default(),
                phase: Phase::Playing,
                frame: 0,
                deaths: 0,
            },
            victory_label: None,
            controls,
            notices: Vec::new(),
        })
    }

    /// Simulates one frame with the given intents.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError`] if a death rebuild fails. The level was
    /// validated at construction, so this only happens with a host that
    /// loses entities on its own.
    pub fn frame(&mut self, intents: Intents) -> Result<FrameOutcome, ConfigurationError> {
        self.host.step(self.config.dt);
        self.state.frame += 1;

        let Some(player) = self.state.buckets.player else {
            return Ok(FrameOutcome::Continued);
        };
        let contacts = collision::resolve(
            &self.state.buckets,
            &mut self.host,
            player,
            &mut self.state.player,
            &self.config.tuning,
        );

        let mut outcome = FrameOutcome::Continued;
        if contacts.won && self.state.phase == Phase::Playing {
            self.win();
            outcome = FrameOutcome::Won;
        }
        if contacts.died && self.state.phase == Phase::Playing {
            self.restart()?;
            return Ok(FrameOutcome::Died);
        }

        let grounded = self.host.is_grounded(player);
        self.state.player.velocity = self.host.velocity(player).unwrap_or_default();
        let pose = player::step(
            &mut self.state.player,
            intents,
            grounded,
            &self.config.tuning,
        );
        self.host.set_velocity(player, self.state.player.velocity);
        self.host.set_frame(player, pose.frame());
        Ok(outcome)
    }

    /// Resizes the presentation surface. World bounds keep their size until
    /// the next rebuild.
    pub fn resize(&mut self, viewport: Viewport) {
        self.host.resize(viewport);
    }

    /// On-screen controller buttons and their overlays.
    ///
    /// Laid out once for the launch viewport; they survive rebuilds and
    /// resizes.
    #[must_use]
    pub fn controls(&self) -> &[(ButtonId, EntityHandle)] {
        &self.controls
    }

    /// Controller button under a screen point.
    #[must_use]
    pub fn control_at(&self, point: Vec2) -> Option<ButtonId> {
        VirtualController::hit_test(self.config.viewport, point)
    }

    /// Removes and returns the queued persistence notices.
    pub fn take_notices(&mut self) -> Vec<PersistenceFailure> {
        std::mem::take(&mut self.notices)
    }

    /// Queued persistence notices.
    #[must_use]
    pub fn notices(&self) -> &[PersistenceFailure] {
        &self.notices
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// State of the current build.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The level as loaded.
    #[must_use]
    pub fn level(&self) -> &LevelDescription {
        &self.level
    }

    /// Where the level came from.
    #[must_use]
    pub fn source(&self) -> LevelSource {
        self.source
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The victory label, once the level is won.
    #[must_use]
    pub fn victory_label(&self) -> Option<EntityHandle> {
        self.victory_label
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ends the session, handing back the host and the store.
    pub fn into_parts(self) -> (H, S) {
        (self.host, self.store)
    }

    fn win(&mut self) {
        let viewport = self.host.viewport();
        let label = self.host.spawn_label(
            &self.config.victory_text,
            viewport.center(),
            LabelAnchor::Viewport,
        );
        self.state.buckets.labels.push(label);
        self.victory_label = Some(label);

        if let Some(goal) = self.state.buckets.goal.take() {
            self.host.destroy(goal);
        }
        self.state.phase = Phase::Won;
        info!(frame = self.state.frame, deaths = self.state.deaths, "level won");

        if let Some(index) = self.source.persisted_index() {
            if let Err(err) = mark_completed(&mut self.store, index) {
                warn!(index, error = %err, "could not save level completion");
                self.notices.push(err);
            }
        }
    }

    /// Destroys every entity of the current build.
    fn teardown(&mut self) {
        for handle in self.state.buckets.drain() {
            self.host.destroy(handle);
        }
        self.victory_label = None;
    }

    fn restart(&mut self) -> Result<(), ConfigurationError> {
        self.teardown();
        let classified = classify(&self.level, &mut self.host, &self.config.tuning)?;
        self.state.buckets = classified.buckets;
        self.state.bounds = classified.bounds;
        self.state.player.reset();
        self.state.deaths += 1;
        info!(
            frame = self.state.frame,
            deaths = self.state.deaths,
            "player died, level rebuilt"
        );
        Ok(())
    }
}

/// Spawns the three controller buttons as viewport overlays.
fn spawn_controls<H: Host>(host: &mut H, viewport: Viewport) -> [(ButtonId, EntityHandle); 3] {
    VirtualController::layout(viewport).map(|(id, area)| {
        let scale = area.size / BUTTON_SIZE;
        (id, host.spawn_overlay(Texture::VgcButton, area.position, scale))
    })
}
