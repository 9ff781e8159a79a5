//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::host::Viewport;
use crate::input::KeyBindings;
use crate::tuning::{PlayerTuning, FIXED_DT};

/// Text shown when the level is completed.
pub const DEFAULT_VICTORY_TEXT: &str = "You win!";

/// Configuration for one play session.
///
/// Every field has a default, so a JSON file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial presentation surface size
    pub viewport: Viewport,
    /// Simulation timestep in seconds
    pub dt: f32,
    /// Player and object tuning
    pub tuning: PlayerTuning,
    /// Keyboard bindings
    pub bindings: KeyBindings,
    /// Victory label text
    pub victory_text: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            dt: FIXED_DT,
            tuning: PlayerTuning::default(),
            bindings: KeyBindings::default(),
            victory_text: DEFAULT_VICTORY_TEXT.to_string(),
        }
    }
}

impl SessionConfig {
    /// Parses and validates a config from JSON.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Parse`] for malformed input or mistyped fields, and
    /// the [`validate`](Self::validate) errors for unusable values.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the timestep and viewport can drive a simulation.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidTimestep`] unless `dt` is finite and positive,
    /// [`SettingsError::InvalidViewport`] unless both sides are.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SettingsError::InvalidTimestep(self.dt));
        }
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SettingsError::InvalidViewport { width, height });
        }
        Ok(())
    }
}
