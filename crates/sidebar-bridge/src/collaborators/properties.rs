//! Session property stores.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{Arc, Mutex};

use camino::Utf8Path;
use cap_std::fs::Dir;

use super::{PropertyStore, StoreError};

/// Property store that lives as long as the process.
///
/// Clones share the same properties, which lets a test keep a handle on the
/// store it gave to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    properties: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn get_property(&self, key: &str) -> Result<Option<String>, StoreError> {
        let properties = self
            .properties
            .lock()
            .map_err(|_| StoreError::poisoned("properties"))?;
        Ok(properties.get(key).cloned())
    }

    fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut properties = self
            .properties
            .lock()
            .map_err(|_| StoreError::poisoned("properties"))?;
        properties.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Property store persisted as a JSON object in a single file.
///
/// The file is resolved through a capability handle on its parent directory,
/// so the store cannot be pointed outside that directory once opened. A
/// missing file reads as an empty store and is created on the first write.
#[derive(Debug)]
pub struct FilePropertyStore {
    dir: Dir,
    file_name: String,
}

impl FilePropertyStore {
    /// Opens the store backed by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the parent directory cannot be opened,
    /// or if `path` does not name a file.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        let file_name = path.file_name().ok_or_else(|| {
            StoreError::io(
                path.as_str(),
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = Dir::open_ambient_dir(parent, cap_std::ambient_authority())
            .map_err(|error| StoreError::io(parent.as_str(), error))?;
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
        })
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match self.dir.read_to_string(&self.file_name) {
            Ok(content) => content,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(StoreError::io(self.file_name.as_str(), error)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|error| StoreError::corrupt(self.file_name.as_str(), error.to_string()))
    }

    fn write_all(&self, properties: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(properties)
            .map_err(|error| StoreError::corrupt(self.file_name.as_str(), error.to_string()))?;
        self.dir
            .write(&self.file_name, encoded)
            .map_err(|error| StoreError::io(self.file_name.as_str(), error))
    }
}

impl PropertyStore for FilePropertyStore {
    fn get_property(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_property(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut properties = self.read_all()?;
        properties.insert(key.to_owned(), value.to_owned());
        self.write_all(&properties)
    }
}
