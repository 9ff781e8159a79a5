//! Launch parameters and level source selection.
//!
//! A session is launched from three parameters, usually read from the page
//! URL query string:
//!
//! - `level`: index into the stored level collection
//! - `storage`: play a stored level; completion is saved on win
//! - `editor`: play the level open in the editor; nothing is saved
//!
//! Flags follow the page convention: a flag is set when the parameter is
//! present with no value (`?storage` or `?storage=`). Exactly one of
//! `storage` and `editor` must be set.

use tracing::debug;

use crate::error::{LaunchError, LoadFailure};
use crate::level::LevelDescription;
use crate::store::{load_editor_level, load_stored_level, KeyValueStore};

/// Raw launch parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Value of the `level` parameter, if present
    pub level: Option<String>,
    /// `storage` flag
    pub storage: bool,
    /// `editor` flag
    pub editor: bool,
}

impl LaunchParams {
    /// Parameters for a stored level.
    #[must_use]
    pub fn stored(index: usize) -> Self {
        Self {
            level: Some(index.to_string()),
            storage: true,
            editor: false,
        }
    }

    /// Parameters for the editor level.
    #[must_use]
    pub fn editor() -> Self {
        Self {
            level: None,
            storage: false,
            editor: true,
        }
    }

    /// Reads parameters from a URL or bare query string.
    ///
    /// The first occurrence of each parameter wins. `+` decodes to a space
    /// and `%XX` escapes are decoded.
    ///
    /// # Example
    ///
    /// ```
    /// use nubium_core::launch::LaunchParams;
    ///
    /// let params = LaunchParams::from_query("play.html?level=2&storage#top");
    /// assert_eq!(params.level.as_deref(), Some("2"));
    /// assert!(params.storage);
    /// assert!(!params.editor);
    /// ```
    #[must_use]
    pub fn from_query(url: &str) -> Self {
        let query = url.split_once('?').map_or(url, |(_, q)| q);
        let query = query.split_once('#').map_or(query, |(q, _)| q);

        let mut level = None;
        let mut storage = None;
        let mut editor = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (decode_component(name), decode_component(value)),
                None => (decode_component(pair), String::new()),
            };
            let slot = match name.as_str() {
                "level" => &mut level,
                "storage" => &mut storage,
                "editor" => &mut editor,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        Self {
            level,
            storage: storage.is_some_and(|v| v.is_empty()),
            editor: editor.is_some_and(|v| v.is_empty()),
        }
    }

    /// Selects the level source.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::NoSource`] / [`LaunchError::AmbiguousSource`] unless
    ///   exactly one flag is set
    /// - [`LaunchError::InvalidLevelIndex`] if `storage` is set and `level`
    ///   is not a canonical decimal integer
    pub fn source(&self) -> Result<LevelSource, LaunchError> {
        match (self.storage, self.editor) {
            (false, false) => Err(LaunchError::NoSource),
            (true, true) => Err(LaunchError::AmbiguousSource),
            (false, true) => Ok(LevelSource::Editor),
            (true, false) => self
                .level
                .as_deref()
                .and_then(parse_index)
                .map(|index| LevelSource::Stored { index })
                .ok_or_else(|| LaunchError::InvalidLevelIndex(self.level.clone())),
        }
    }
}

/// A level index in canonical decimal form: ASCII digits, no sign, no
/// padding, no leading zero.
fn parse_index(raw: &str) -> Option<usize> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if !canonical {
        return None;
    }
    raw.parse().ok()
}

/// Where the session's level comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    /// Level `index` of the stored collection; completion is persisted.
    Stored {
        /// Index into the collection
        index: usize,
    },
    /// The editor level; no-persistence mode.
    Editor,
}

impl LevelSource {
    /// Index whose completion flag should be written on win, if any.
    #[must_use]
    pub const fn persisted_index(self) -> Option<usize> {
        match self {
            Self::Stored { index } => Some(index),
            Self::Editor => None,
        }
    }

    /// Loads the level from `store`.
    ///
    /// # Errors
    ///
    /// Any [`LoadFailure`] from the store or level validation.
    pub fn load<S: KeyValueStore + ?Sized>(
        self,
        store: &S,
    ) -> Result<LevelDescription, LoadFailure> {
        debug!(source = ?self, "loading level");
        match self {
            Self::Stored { index } => load_stored_level(store, index),
            Self::Editor => load_editor_level(store),
        }
    }
}

/// Decodes one query component: `+` is a space, `%XX` is a byte.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
