//! Snapshot store backed by a single pretty-printed JSON file.
//!
//! Saves go to a temp file in the target directory which is fsynced and then
//! renamed over the target, so readers see either the old or the new document.
//! Loads and saves also take an advisory lock on a sibling `<file>.lock`
//! (shared for loads, exclusive for saves) so several processes pointed at the
//! same file do not interleave writes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::r#trait::{InventorySnapshot, SnapshotStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// document (`{"items": [], "movements": []}`) if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut lock_name = path.file_name().unwrap_or_default().to_os_string();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        let store = Self { path, lock_path };
        fs::create_dir_all(store.dir()).map_err(|e| StoreError::io(store.dir(), e))?;

        if !store.path.exists() {
            store.save(&InventorySnapshot::default())?;
            info!(path = %store.path.display(), "initialized empty inventory file");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Lock is released when the returned handle is dropped.
    fn lock(&self, exclusive: bool) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| StoreError::io(&self.lock_path, e))?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|source| StoreError::Lock {
            path: self.lock_path.clone(),
            source,
        })?;

        Ok(file)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<InventorySnapshot, StoreError> {
        let _guard = self.lock(false)?;

        let bytes = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let snapshot: InventorySnapshot =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            movements = snapshot.movements.len(),
            "loaded inventory file"
        );
        Ok(snapshot)
    }

    fn save(&self, snapshot: &InventorySnapshot) -> Result<(), StoreError> {
        let mut bytes = serde_json::to_vec_pretty(snapshot).map_err(StoreError::Encode)?;
        bytes.push(b'\n');

        let _guard = self.lock(true)?;

        let dir = self.dir();
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes).map_err(|e| StoreError::io(tmp.path(), e))?;
        // Temp files are created owner-only; keep whatever mode the target had.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| StoreError::io(tmp.path(), e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote inventory file");
        Ok(())
    }
}
