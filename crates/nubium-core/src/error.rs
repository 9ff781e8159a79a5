//! Error taxonomy for the platformer runtime.
//!
//! - [`LoadFailure`]: level data missing or unusable. Fatal, nothing runs.
//! - [`ConfigurationError`]: the level breaks the one-player/one-goal rule.
//! - [`PersistenceFailure`]: the completion flag could not be written. Never
//!   fatal; the session queues it as a notice and keeps running.
//! - [`LaunchError`]: the launch parameters do not select exactly one source.
//! - [`StoreError`]: the key-value backend itself failed.
//! - [`SettingsError`]: the session configuration cannot drive a simulation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::level::ObjectKind;

/// The key-value backend failed to read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store file {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The backing file is not a JSON object of string values.
    #[error("store file {path} is malformed: {source}")]
    Format {
        /// Backing file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
    /// The store refuses writes.
    #[error("store is read-only")]
    ReadOnly,
}

/// A level violates the singleton rule for players and goals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No object of a required singleton kind.
    #[error("level has no {0} object")]
    MissingSingleton(ObjectKind),
    /// More than one object of a singleton kind.
    #[error("level has {count} {kind} objects, expected exactly one")]
    DuplicateSingleton {
        /// The singleton kind
        kind: ObjectKind,
        /// How many were found
        count: usize,
    },
}

/// Session configuration is unusable.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The config file is not valid JSON for a [`SessionConfig`](crate::config::SessionConfig).
    #[error("config is unreadable: {0}")]
    Parse(#[from] serde_json::Error),
    /// The timestep is zero, negative or not finite.
    #[error("timestep must be finite and positive, got {0}")]
    InvalidTimestep(f32),
    /// A viewport side is zero, negative or not finite.
    #[error("viewport must be positive, got {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },
}

/// Level data could not be obtained. No simulation starts.
#[derive(Debug, Error)]
pub enum LoadFailure {
    /// Nothing stored under the key.
    #[error("no level data stored under `{key}`")]
    Missing {
        /// Store key
        key: &'static str,
    },
    /// The stored value is not valid JSON for a level.
    #[error("level data under `{key}` is unreadable: {source}")]
    Parse {
        /// Store key
        key: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
    /// The level collection has no entry at the index.
    #[error("level {index} not found under `{key}`")]
    UnknownLevel {
        /// Store key
        key: &'static str,
        /// Requested index
        index: usize,
    },
    /// An object is malformed (e.g. a text object without text).
    #[error("invalid level object #{index}: {reason}")]
    InvalidObject {
        /// Position of the object in the level
        index: usize,
        /// What is wrong with it
        reason: &'static str,
    },
    /// Singleton rule violated.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Backend failure while reading.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The completion flag could not be saved.
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    /// The level collection disappeared from the store.
    #[error("completion not saved: nothing stored under `{key}`")]
    MissingCollection {
        /// Store key
        key: &'static str,
    },
    /// The level collection is not a JSON array of objects.
    #[error("completion not saved: level collection is unreadable: {0}")]
    Parse(#[source] serde_json::Error),
    /// The collection has no level object at the index.
    #[error("completion not saved: level {index} not found")]
    UnknownLevel {
        /// Requested index
        index: usize,
    },
    /// Backend failure while reading or writing.
    #[error("completion not saved: {0}")]
    Store(#[from] StoreError),
}

/// Launch parameters do not describe a playable session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    /// Neither `storage` nor `editor` was given.
    #[error("no level source selected (expected `storage` or `editor`)")]
    NoSource,
    /// Both `storage` and `editor` were given.
    #[error("both `storage` and `editor` selected")]
    AmbiguousSource,
    /// `storage` was given without a usable `level` index.
    #[error("missing or invalid `level` parameter: {0:?}")]
    InvalidLevelIndex(Option<String>),
}

/// Fatal session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad launch parameters.
    #[error(transparent)]
    Launch(#[from] LaunchError),
    /// Level could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadFailure),
    /// Level could not be built.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Session configuration is unusable.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
