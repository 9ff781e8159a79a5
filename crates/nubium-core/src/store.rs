//! String-keyed persistence for level definitions and completion flags.
//!
//! Two keys are used:
//!
//! - [`LEVELS_KEY`]: a JSON array of level objects, addressed by index. The
//!   completion flag of a level is the `completed` field of its object.
//! - [`EDITOR_KEY`]: the single level currently open in the editor.
//!
//! Backends implement [`KeyValueStore`]. [`MemoryStore`] keeps values in
//! memory; [`JsonFileStore`] mirrors them into a JSON file on every write,
//! replacing the file in one rename so a crash never leaves it half written.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{LoadFailure, PersistenceFailure, StoreError};
use crate::level::LevelDescription;

/// Key holding the level collection.
pub const LEVELS_KEY: &str = "nubium_levels";

/// Key holding the level open in the editor.
pub const EDITOR_KEY: &str = "nubium_editor";

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store.
///
/// # Example
///
/// ```
/// use nubium_core::store::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("greeting", "hello".to_string()).unwrap();
/// assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, builder style.
    #[must_use]
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON object file of string values.
///
/// The whole file is read on [`open`](Self::open) and rewritten on every
/// [`set`](KeyValueStore::set).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens a store file. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read and
    /// [`StoreError::Format`] if it is not a JSON object of strings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Format {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StoreError::Format {
                path: self.path.clone(),
                source,
            }
        })?;
        let staging = self.staging_path();
        fs::write(&staging, text)
            .and_then(|()| fs::rename(&staging, &self.path))
            .map_err(|source| {
                let _ = fs::remove_file(&staging);
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            })
    }

    /// Sibling file a write goes to before replacing the store file.
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

/// Loads level `index` from the level collection.
///
/// # Errors
///
/// - [`LoadFailure::Missing`] if the collection is absent
/// - [`LoadFailure::Parse`] if it is not a JSON array of levels
/// - [`LoadFailure::UnknownLevel`] if `index` is out of range
/// - validation errors from [`LevelDescription::validate`]
pub fn load_stored_level<S: KeyValueStore + ?Sized>(
    store: &S,
    index: usize,
) -> Result<LevelDescription, LoadFailure> {
    let raw = store
        .get(LEVELS_KEY)?
        .ok_or(LoadFailure::Missing { key: LEVELS_KEY })?;
    let mut levels: Vec<Value> = serde_json::from_str(&raw).map_err(|source| LoadFailure::Parse {
        key: LEVELS_KEY,
        source,
    })?;
    if index >= levels.len() {
        return Err(LoadFailure::UnknownLevel {
            key: LEVELS_KEY,
            index,
        });
    }
    let level: LevelDescription =
        serde_json::from_value(levels.swap_remove(index)).map_err(|source| LoadFailure::Parse {
            key: LEVELS_KEY,
            source,
        })?;
    level.validate()?;
    debug!(index, objects = level.objects.len(), "loaded stored level");
    Ok(level)
}

/// Loads the level open in the editor.
///
/// # Errors
///
/// [`LoadFailure::Missing`], [`LoadFailure::Parse`] or a validation error.
pub fn load_editor_level<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<LevelDescription, LoadFailure> {
    let raw = store
        .get(EDITOR_KEY)?
        .ok_or(LoadFailure::Missing { key: EDITOR_KEY })?;
    let level = LevelDescription::from_json_str(&raw, EDITOR_KEY)?;
    debug!(objects = level.objects.len(), "loaded editor level");
    Ok(level)
}

/// Sets `completed = true` on level `index`, keeping every other field.
///
/// # Errors
///
/// Any read, parse, lookup or write problem, as a [`PersistenceFailure`].
pub fn mark_completed<S: KeyValueStore + ?Sized>(
    store: &mut S,
    index: usize,
) -> Result<(), PersistenceFailure> {
    let raw = store
        .get(LEVELS_KEY)?
        .ok_or(PersistenceFailure::MissingCollection { key: LEVELS_KEY })?;
    let mut levels: Vec<Value> = serde_json::from_str(&raw).map_err(PersistenceFailure::Parse)?;
    let level = levels
        .get_mut(index)
        .and_then(Value::as_object_mut)
        .ok_or(PersistenceFailure::UnknownLevel { index })?;
    level.insert("completed".to_string(), Value::Bool(true));

    let text = serde_json::to_string(&levels).map_err(PersistenceFailure::Parse)?;
    store.set(LEVELS_KEY, text)?;
    debug!(index, "level marked completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::ObjectKind;

    const LEVEL: &str = r#"{"objects":[
        {"type":"player","position":[0,0]},
        {"type":"goal","position":[100,0],"size":[10,10]}
    ],"name":"first"}"#;

    fn store_with_levels(levels: &str) -> MemoryStore {
        MemoryStore::new().with_entry(LEVELS_KEY, levels)
    }

    mod load_tests {
        use super::*;

        #[test]
        fn loads_level_by_index() {
            let store = store_with_levels(&format!("[{LEVEL},{LEVEL}]"));
            let level = load_stored_level(&store, 1).unwrap();
            assert_eq!(level.count(ObjectKind::Goal), 1);
        }

        #[test]
        fn missing_collection() {
            let err = load_stored_level(&MemoryStore::new(), 0).unwrap_err();
            assert!(matches!(err, LoadFailure::Missing { key: LEVELS_KEY }));
        }

        #[test]
        fn unparseable_collection() {
            let err = load_stored_level(&store_with_levels("oops"), 0).unwrap_err();
            assert!(matches!(err, LoadFailure::Parse { .. }));
        }

        #[test]
        fn index_out_of_range() {
            let err = load_stored_level(&store_with_levels(&format!("[{LEVEL}]")), 3).unwrap_err();
            assert!(matches!(err, LoadFailure::UnknownLevel { index: 3, .. }));
        }

        #[test]
        fn invalid_level_in_collection() {
            let store = store_with_levels(r#"[{"objects":[{"type":"player","position":[0,0]}]}]"#);
            let err = load_stored_level(&store, 0).unwrap_err();
            assert!(matches!(err, LoadFailure::Configuration(_)));
        }

        #[test]
        fn loads_editor_level() {
            let store = MemoryStore::new().with_entry(EDITOR_KEY, LEVEL);
            assert!(load_editor_level(&store).is_ok());
            assert!(matches!(
                load_editor_level(&MemoryStore::new()),
                Err(LoadFailure::Missing { key: EDITOR_KEY })
            ));
        }
    }

    mod completion_tests {
        use super::*;

        #[test]
        fn marks_only_the_indexed_level() {
            let mut store = store_with_levels(&format!("[{LEVEL},{LEVEL}]"));
            mark_completed(&mut store, 1).unwrap();

            let raw = store.get(LEVELS_KEY).unwrap().unwrap();
            let levels: Vec<Value> = serde_json::from_str(&raw).unwrap();
            assert_eq!(levels[1]["completed"], Value::Bool(true));
            assert!(levels[0].get("completed").is_none());
            assert_eq!(levels[1]["name"], "first");
            assert!(load_stored_level(&store, 1).unwrap().completed);
        }

        #[test]
        fn missing_collection_is_failure() {
            let err = mark_completed(&mut MemoryStore::new(), 0).unwrap_err();
            assert!(matches!(err, PersistenceFailure::MissingCollection { .. }));
        }

        #[test]
        fn unknown_index_is_failure() {
            let mut store = store_with_levels(&format!("[{LEVEL}]"));
            let err = mark_completed(&mut store, 5).unwrap_err();
            assert!(matches!(err, PersistenceFailure::UnknownLevel { index: 5 }));
        }

        #[test]
        fn corrupt_collection_is_failure() {
            let mut store = store_with_levels("{");
            let err = mark_completed(&mut store, 0).unwrap_err();
            assert!(matches!(err, PersistenceFailure::Parse(_)));
        }
    }

    mod file_store_tests {
        use super::*;

        fn temp_path(name: &str) -> PathBuf {
            std::env::temp_dir().join(format!("nubium-{}-{name}.json", std::process::id()))
        }

        #[test]
        fn missing_file_is_empty_store() {
            let store = JsonFileStore::open(temp_path("missing")).unwrap();
            assert!(store.get(LEVELS_KEY).unwrap().is_none());
        }

        #[test]
        fn writes_survive_reopen() {
            let path = temp_path("reopen");
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set(LEVELS_KEY, format!("[{LEVEL}]")).unwrap();
            mark_completed(&mut store, 0).unwrap();

            let reopened = JsonFileStore::open(&path).unwrap();
            assert!(load_stored_level(&reopened, 0).unwrap().completed);
            fs::remove_file(path).unwrap();
        }

        #[test]
        fn write_leaves_no_staging_file() {
            let path = temp_path("staging");
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set(EDITOR_KEY, LEVEL.to_string()).unwrap();

            assert!(path.exists());
            assert!(!store.staging_path().exists());
            fs::remove_file(path).unwrap();
        }

        #[test]
        fn failed_write_keeps_previous_file() {
            let path = temp_path("failed-write");
            let mut store = JsonFileStore::open(&path).unwrap();
            store.set(LEVELS_KEY, format!("[{LEVEL}]")).unwrap();
            let before = fs::read_to_string(&path).unwrap();

            // A directory in the staging spot makes the write fail.
            let staging = store.staging_path();
            fs::create_dir(&staging).unwrap();
            let err = store.set(EDITOR_KEY, LEVEL.to_string()).unwrap_err();
            assert!(matches!(err, StoreError::Io { .. }));
            assert_eq!(fs::read_to_string(&path).unwrap(), before);

            fs::remove_dir(staging).unwrap();
            fs::remove_file(path).unwrap();
        }

        #[test]
        fn malformed_file_is_format_error() {
            let path = temp_path("malformed");
            fs::write(&path, "[1, 2]").unwrap();
            let err = JsonFileStore::open(&path).unwrap_err();
            assert!(matches!(err, StoreError::Format { .. }));
            fs::remove_file(path).unwrap();
        }
    }
}
