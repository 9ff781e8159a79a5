//! Test helper functions for building levels and sessions.

use glam::Vec2;

use crate::config::SessionConfig;
use crate::entity::EntityHandle;
use crate::error::StoreError;
use crate::host::ArcadeHost;
use crate::input::Intents;
use crate::launch::LaunchParams;
use crate::level::{LevelDescription, ObjectKind, ObjectSpec};
use crate::session::{FrameOutcome, Session};
use crate::store::{KeyValueStore, MemoryStore, EDITOR_KEY, LEVELS_KEY};

/// Session type used throughout the tests.
pub type TestSession = Session<ArcadeHost, MemoryStore>;

// =============================================================================
// Levels
// =============================================================================

/// Player at the origin, goal 100 units to the right, one platform under
/// both.
pub fn walk_to_goal_level() -> LevelDescription {
    LevelDescription::new(vec![
        ObjectSpec::new(ObjectKind::Player, Vec2::ZERO),
        ObjectSpec::new(ObjectKind::Goal, Vec2::new(100.0, 0.0)).with_size(Vec2::new(10.0, 10.0)),
        ObjectSpec::new(ObjectKind::Platform, Vec2::new(0.0, 20.0))
            .with_size(Vec2::new(200.0, 10.0)),
    ])
}

/// Player standing at (0, 300) on a 200-wide floor of `floor` kind, with the
/// goal out of reach.
///
/// The player starts mid-screen so a jump is not stopped by the top of the
/// world.
pub fn standing_level(floor: ObjectKind) -> LevelDescription {
    LevelDescription::new(vec![
        ObjectSpec::new(ObjectKind::Player, Vec2::new(0.0, 300.0)),
        ObjectSpec::new(floor, Vec2::new(0.0, 320.0)).with_size(Vec2::new(200.0, 10.0)),
        ObjectSpec::new(ObjectKind::Goal, Vec2::new(700.0, 100.0))
            .with_size(Vec2::new(10.0, 10.0)),
    ])
}

/// Long floor with objects placed on it at `x = 100` and beyond.
///
/// Each entry is a kind and the left edge of a 10×20 block resting on the
/// floor. The goal must be one of them.
pub fn corridor_level(blocks: &[(ObjectKind, f32)]) -> LevelDescription {
    let mut objects = vec![
        ObjectSpec::new(ObjectKind::Player, Vec2::new(0.0, 300.0)),
        ObjectSpec::new(ObjectKind::Platform, Vec2::new(0.0, 320.0))
            .with_size(Vec2::new(800.0, 10.0)),
        ObjectSpec::text(Vec2::new(10.0, 250.0), "Go right"),
    ];
    objects.extend(blocks.iter().map(|&(kind, x)| {
        ObjectSpec::new(kind, Vec2::new(x, 300.0)).with_size(Vec2::new(10.0, 20.0))
    }));
    LevelDescription::new(objects)
}

// =============================================================================
// Sessions
// =============================================================================

/// Store holding `levels` as the level collection.
pub fn store_with_levels(levels: &[LevelDescription]) -> MemoryStore {
    let json = serde_json::to_string(levels).unwrap();
    MemoryStore::new().with_entry(LEVELS_KEY, json)
}

/// Session on level 0 of a collection holding only `level`.
pub fn stored_session(level: &LevelDescription) -> TestSession {
    launch(&LaunchParams::stored(0), store_with_levels(std::slice::from_ref(level)))
}

/// Session on `level` opened from the editor.
pub fn editor_session(level: &LevelDescription) -> TestSession {
    let store =
        MemoryStore::new().with_entry(EDITOR_KEY, serde_json::to_string(level).unwrap());
    launch(&LaunchParams::editor(), store)
}

/// Launches with the default config.
pub fn launch<S: KeyValueStore>(params: &LaunchParams, store: S) -> Session<ArcadeHost, S> {
    let config = SessionConfig::default();
    let host = ArcadeHost::new(config.viewport);
    Session::launch(params, store, host, config).unwrap()
}

/// Runs up to `frames` frames with constant intents, stopping after the
/// first terminal outcome. Returns the outcomes.
pub fn run_until_terminal<S: KeyValueStore>(
    session: &mut Session<ArcadeHost, S>,
    intents: Intents,
    frames: usize,
) -> Vec<FrameOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..frames {
        let outcome = session.frame(intents).unwrap();
        outcomes.push(outcome);
        if outcome != FrameOutcome::Continued {
            break;
        }
    }
    outcomes
}

// =============================================================================
// Queries
// =============================================================================

/// The current player handle.
pub fn player<S: KeyValueStore>(session: &Session<ArcadeHost, S>) -> EntityHandle {
    session.state().buckets.player.unwrap()
}

/// Every live handle of the current build, sorted.
pub fn all_handles<S: KeyValueStore>(session: &Session<ArcadeHost, S>) -> Vec<EntityHandle> {
    let mut handles = session.state().buckets.clone().drain();
    handles.sort();
    handles
}

// =============================================================================
// Stores
// =============================================================================

/// Store that serves reads from an inner store and rejects every write.
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyStore(pub MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly)
    }
}
