//! Key-value blob storage behind the record store.
//!
//! Each key holds one serialized collection. Backends know nothing about the
//! records themselves; they only move strings in and out.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::VouchError;

pub trait KeyValueBackend {
    /// `Ok(None)` means the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>, VouchError>;

    /// Overwrites whatever is stored at `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), VouchError>;

    /// Reachability check used when a data source connects.
    fn probe(&self) -> Result<(), VouchError> {
        Ok(())
    }

    fn describe(&self) -> String;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, VouchError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(VouchError::read(key, format!("{}: {err}", path.display()))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), VouchError> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| VouchError::write(key, format!("create {}: {err}", self.dir.display())))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .map_err(|err| VouchError::write(key, format!("{}: {err}", path.display())))
    }

    fn probe(&self) -> Result<(), VouchError> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(VouchError::read(
                "",
                format!("{} is not a directory", self.dir.display()),
            ));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file store at {}", self.dir.display())
    }
}

/// In-memory store. Clones share the same map, so a test can reopen a
/// session over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, VouchError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), VouchError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
