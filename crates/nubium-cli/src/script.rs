//! Scripted input timelines.
//!
//! A script is a comma-separated list of `frames:keys` segments, for example
//! `60:R,1:RJ,30:`. Keys are any of `L` (left), `R` (right) and `J` (jump);
//! an empty key list holds nothing. The last segment keeps playing once the
//! script runs out.

use std::iter;
use std::str::FromStr;

use nubium_core::input::{InputAggregator, KeyBindings};
use thiserror::Error;

/// A script that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// A segment has no `:` separator.
    #[error("segment `{0}` is not of the form frames:keys")]
    MissingSeparator(String),
    /// The frame count is not a number.
    #[error("segment `{0}` has an invalid frame count")]
    InvalidFrames(String),
    /// A key letter is not one of L, R, J.
    #[error("unknown key `{key}` in segment `{segment}`")]
    UnknownKey {
        /// Offending letter
        key: char,
        /// Segment it appeared in
        segment: String,
    },
}

/// Keys held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Held {
    /// Left key
    pub left: bool,
    /// Right key
    pub right: bool,
    /// Jump key
    pub jump: bool,
}

impl Held {
    /// Presses or releases the bound keys to match.
    pub fn apply(self, input: &mut InputAggregator, bindings: &KeyBindings) {
        for (key, down) in [
            (bindings.left, self.left),
            (bindings.right, self.right),
            (bindings.jump, self.jump),
        ] {
            if down {
                input.key_down(key);
            } else {
                input.key_up(key);
            }
        }
    }
}

/// One run of identical frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// How many frames
    pub frames: usize,
    /// Keys held throughout
    pub held: Held,
}

/// A parsed input timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    segments: Vec<Segment>,
}

impl Script {
    /// Total frames covered by the segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.frames).sum()
    }

    /// Whether the script has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Keys for every frame, holding the last segment forever.
    pub fn frames(&self) -> impl Iterator<Item = Held> + '_ {
        let tail = self.segments.last().map_or(Held::default(), |s| s.held);
        self.segments
            .iter()
            .flat_map(|segment| iter::repeat(segment.held).take(segment.frames))
            .chain(iter::repeat(tail))
    }
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (frames, keys) = part
                .split_once(':')
                .ok_or_else(|| ScriptError::MissingSeparator(part.to_string()))?;
            let frames = frames
                .trim()
                .parse()
                .map_err(|_| ScriptError::InvalidFrames(part.to_string()))?;

            let mut held = Held::default();
            for key in keys.trim().chars() {
                match key.to_ascii_uppercase() {
                    'L' => held.left = true,
                    'R' => held.right = true,
                    'J' => held.jump = true,
                    _ => {
                        return Err(ScriptError::UnknownKey {
                            key,
                            segment: part.to_string(),
                        })
                    }
                }
            }
            segments.push(Segment { frames, held });
        }
        Ok(Self { segments })
    }
}
