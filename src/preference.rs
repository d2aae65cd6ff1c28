//! Persisted user preferences.
//!
//! The language manager stores a single `key -> language code` pair. The
//! storage behind it is pluggable: a JSON file for real hosts, or memory for
//! tests and embedders that persist elsewhere.

use std::collections::HashMap;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
};

use serde_json::{
    Map,
    Value,
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Directory name used under the platform config directory.
const APP_DIR_NAME: &str = "site-i18n";
/// File name of the default preference file.
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Errors raised by a [`PreferenceStore`]
#[derive(Error, Debug)]
pub enum PreferenceError {
    /// Reading or writing the file failed
    #[error("Failed to access preference file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("Failed to parse preference file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file is valid JSON but not an object
    #[error("Preference file '{0}' does not contain a JSON object")]
    Malformed(PathBuf),
}

/// Key-value storage for string preferences.
pub trait PreferenceStore: Send + Sync {
    /// # Errors
    /// Returns error if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// # Errors
    /// Returns error if the underlying storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set(key, value)
    }
}

/// Preferences kept in a JSON object file.
///
/// Every `set` rewrites the whole file through a temporary file and a rename,
/// keeping any other keys in it. A file that cannot be parsed is replaced.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    /// Location of the JSON file
    path: PathBuf,
}

impl FilePreferenceStore {
    /// Store backed by the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/site-i18n/preferences.json`, if the platform has a config directory.
    #[must_use]
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(PREFERENCES_FILE_NAME))
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing or blank file is an empty map.
    fn read_all(&self) -> Result<Map<String, Value>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_str(&content)?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(PreferenceError::Malformed(self.path.clone())),
        }
    }

    /// Replace the file contents with `values` in one rename.
    fn write_all(&self, values: Map<String, Value>) -> Result<(), PreferenceError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(serde_json::to_string_pretty(&Value::Object(values))?.as_bytes())?;
        file.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let values = self.read_all()?;
        Ok(values.get(key).and_then(Value::as_str).map(ToString::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(error @ (PreferenceError::Parse(_) | PreferenceError::Malformed(_))) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Preference file is unreadable, replacing it"
                );
                Map::new()
            }
            Err(error) => return Err(error),
        };
        values.insert(key.to_string(), Value::String(value.to_string()));

        self.write_all(values)?;

        tracing::debug!(path = %self.path.display(), key, value, "Preference saved");
        Ok(())
    }
}

/// In-memory preferences. Counts writes so callers can observe persistence.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    /// Stored values
    values: Mutex<HashMap<String, String>>,
    /// Number of `set` calls so far
    writes: AtomicUsize,
}

impl MemoryPreferenceStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `key -> value`.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(key.into(), value.into());
        store
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Lock the values, ignoring poisoning since every write is a single insert.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.lock().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
