//! Level descriptions as authored by the level editor.
//!
//! A level is an ordered list of objects. The JSON form is the one the editor
//! writes into the store:
//!
//! ```json
//! {
//!   "objects": [
//!     { "type": "player",   "position": [0, 0] },
//!     { "type": "goal",     "position": [100, 0], "size": [10, 10] },
//!     { "type": "platform", "position": [0, 20], "size": [200, 10], "depth": 1 },
//!     { "type": "text",     "position": [10, 60], "text": "Go right" }
//!   ],
//!   "completed": false
//! }
//! ```
//!
//! `size` defaults to `[0, 0]` (keep the sprite's native size) and `depth`
//! to `0` (keep the default draw order).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, LoadFailure};

/// Kind of a level object, using the editor's names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Non-physical text label
    Text,
    /// Player spawn point
    Player,
    /// Solid platform
    Platform,
    /// Platform that falls once stepped on
    PlatformFall,
    /// Deadly obstacle
    Damage,
    /// Sticky surface
    Glue,
    /// Jump booster
    Extrajump,
    /// Level exit
    Goal,
}

impl ObjectKind {
    /// Kinds that must appear exactly once per level.
    pub const SINGLETONS: [ObjectKind; 2] = [ObjectKind::Player, ObjectKind::Goal];
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Player => write!(f, "player"),
            Self::Platform => write!(f, "platform"),
            Self::PlatformFall => write!(f, "platform_fall"),
            Self::Damage => write!(f, "damage"),
            Self::Glue => write!(f, "glue"),
            Self::Extrajump => write!(f, "extrajump"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// One authored object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    /// What the object is
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Top-left corner in world units
    pub position: Vec2,
    /// Explicit size; zero keeps the native size
    #[serde(default)]
    pub size: Vec2,
    /// Draw-order bias; zero keeps the default order
    #[serde(default)]
    pub depth: f32,
    /// Label text, only for `text` objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ObjectSpec {
    /// A physical object at `position` with native size and default depth.
    #[must_use]
    pub fn new(kind: ObjectKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            size: Vec2::ZERO,
            depth: 0.0,
            text: None,
        }
    }

    /// A text label.
    #[must_use]
    pub fn text(position: Vec2, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(ObjectKind::Text, position)
        }
    }

    /// Sets an explicit size.
    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Sets a draw-order bias.
    #[must_use]
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Whether the size overrides the sprite's native size.
    #[must_use]
    pub fn has_size_override(&self) -> bool {
        self.size != Vec2::ZERO
    }

    /// Whether the depth overrides the default draw order.
    #[must_use]
    pub fn has_depth_override(&self) -> bool {
        self.depth != 0.0
    }
}

/// A complete level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// Objects in authoring order
    pub objects: Vec<ObjectSpec>,
    /// Whether the player has finished this level before
    #[serde(default)]
    pub completed: bool,
}

impl LevelDescription {
    /// Creates a level from its objects.
    #[must_use]
    pub fn new(objects: Vec<ObjectSpec>) -> Self {
        Self {
            objects,
            completed: false,
        }
    }

    /// Parses and validates a level from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadFailure::Parse`] for malformed JSON and the errors of
    /// [`validate`](Self::validate) for well-formed but unusable levels.
    pub fn from_json_str(json: &str, key: &'static str) -> Result<Self, LoadFailure> {
        let level: Self =
            serde_json::from_str(json).map_err(|source| LoadFailure::Parse { key, source })?;
        level.validate()?;
        Ok(level)
    }

    /// Checks that the level can be built.
    ///
    /// # Errors
    ///
    /// - [`LoadFailure::InvalidObject`] for a text object without text or a
    ///   non-finite coordinate
    /// - [`LoadFailure::Configuration`] when the player or goal is missing or
    ///   duplicated
    pub fn validate(&self) -> Result<(), LoadFailure> {
        for (index, object) in self.objects.iter().enumerate() {
            if object.kind == ObjectKind::Text && object.text.is_none() {
                return Err(LoadFailure::InvalidObject {
                    index,
                    reason: "text object without text",
                });
            }
            if !object.position.is_finite() || !object.size.is_finite() || !object.depth.is_finite()
            {
                return Err(LoadFailure::InvalidObject {
                    index,
                    reason: "non-finite coordinate",
                });
            }
        }
        check_singletons(&self.objects)?;
        Ok(())
    }

    /// Number of objects of a kind.
    #[must_use]
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}

/// Checks that every singleton kind appears exactly once.
///
/// # Errors
///
/// Returns the first violated kind, in [`ObjectKind::SINGLETONS`] order.
pub fn check_singletons(objects: &[ObjectSpec]) -> Result<(), ConfigurationError> {
    for kind in ObjectKind::SINGLETONS {
        match objects.iter().filter(|o| o.kind == kind).count() {
            1 => {}
            0 => return Err(ConfigurationError::MissingSingleton(kind)),
            count => return Err(ConfigurationError::DuplicateSingleton { kind, count }),
        }
    }
    Ok(())
}
