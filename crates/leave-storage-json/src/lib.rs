use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use leave_core::{
    storage::{KeyValueStore, StorageKey},
    CoreError,
};
use tracing::debug;

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed store keeping one JSON document per storage key.
#[derive(Debug, Clone)]
pub struct JsonKeyValueStore {
    root: PathBuf,
}

impl JsonKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: StorageKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.as_str(), FILE_EXTENSION))
    }

    /// Keys that currently have a document on disk.
    pub fn stored_keys(&self) -> Vec<StorageKey> {
        StorageKey::ALL
            .into_iter()
            .filter(|key| self.key_path(*key).exists())
            .collect()
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError> {
        let path = self.key_path(key);
        write_atomic(&path, value)?;
        debug!(path = %path.display(), "stored {key}");
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), CoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
