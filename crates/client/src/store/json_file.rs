use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bankrollgod_core::errors::{Error, Result};

/// One JSON document on disk, read and written whole under a lock.
///
/// A missing or empty file reads as `T::default()`.
#[derive(Debug)]
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::storage("Store lock poisoned"))?;
        self.read_locked()
    }

    pub fn write(&self, doc: &T) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::storage("Store lock poisoned"))?;
        self.write_locked(doc)
    }

    pub fn remove(&self) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| Error::storage("Store lock poisoned"))?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn read_locked(&self) -> Result<T> {
        if !self.path.exists() {
            return Ok(T::default());
        }
        let raw = fs::read(&self.path).map_err(|e| storage_error(&self.path, e))?;
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&raw).map_err(|e| storage_error(&self.path, e))
    }

    fn write_locked(&self, doc: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, json).map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::storage(format!("{}: {}", path.display(), e))
}
