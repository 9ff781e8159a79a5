//! # Nubium Core
//!
//! Level simulation and player state machine for the Nubium platformer.
//!
//! A level authored in the editor is loaded from a key-value store, built
//! into a render/physics [`Host`](host::Host) and simulated one fixed-size
//! frame at a time until the player reaches the goal.
//!
//! ## Architecture
//!
//! - **Level Loader** ([`level`], [`store`], [`launch`]): launch parameters
//!   select a source, the source yields a validated [`LevelDescription`]
//! - **Entity Classifier** ([`classifier`]): objects become host entities,
//!   bucketed by [`Role`]
//! - **Input Aggregator** ([`input`]): keyboard and virtual buttons merged
//!   into [`Intents`]
//! - **Collision Resolver** ([`collision`]): the player against each bucket,
//!   in a fixed order
//! - **Player State Machine** ([`player`]): running, jumping, glue and boost
//! - **Session Controller** ([`session`]): win, death and rebuild
//!
//! Everything is single-threaded and deterministic: the same level and the
//! same intent sequence always produce the same frames.
//!
//! ## Usage
//!
//! ```
//! use nubium_core::{ArcadeHost, Intents, LaunchParams, MemoryStore, Session, SessionConfig};
//! use nubium_core::store::EDITOR_KEY;
//!
//! let store = MemoryStore::new().with_entry(
//!     EDITOR_KEY,
//!     r#"{"objects":[
//!         {"type":"player","position":[0,0]},
//!         {"type":"goal","position":[300,0],"size":[10,10]}
//!     ]}"#,
//! );
//! let config = SessionConfig::default();
//! let host = ArcadeHost::new(config.viewport);
//! let mut session = Session::launch(&LaunchParams::editor(), store, host, config).unwrap();
//! session.frame(Intents::RIGHT).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod host;
pub mod input;
pub mod launch;
pub mod level;
pub mod player;
pub mod session;
pub mod store;
pub mod tuning;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use config::SessionConfig;
pub use entity::{EntityHandle, Role};
pub use error::{
    ConfigurationError, LaunchError, LoadFailure, PersistenceFailure, SessionError, SettingsError,
};
pub use host::{ArcadeHost, Host, Viewport};
pub use input::{InputAggregator, Intents};
pub use launch::{LaunchParams, LevelSource};
pub use level::{LevelDescription, ObjectKind, ObjectSpec};
pub use session::{FrameOutcome, Phase, Session};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tuning::PlayerTuning;
