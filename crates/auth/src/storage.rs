//! Where session snapshots live between runs.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::error::SessionResult;

/// Persistence backend for the session snapshot.
pub trait SessionStorage: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> SessionResult<Option<Value>>;
    fn save(&self, snapshot: &Value) -> SessionResult<()>;
    fn clear(&self) -> SessionResult<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> SessionResult<Option<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&self, snapshot: &Value) -> SessionResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.staging_path();
        let mut file = create_private(&staging)?;
        file.write_all(&serde_json::to_vec_pretty(snapshot)?)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), "session snapshot written");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// The snapshot carries bearer credentials, so on unix only the owner may
/// read it.
fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        options.mode(0o600);
        let file = options.open(path)?;
        // A leftover staging file keeps its old mode on open.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }

    #[cfg(not(unix))]
    {
        options.open(path)
    }
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Value>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous run had persisted `snapshot`.
    pub fn with_snapshot(snapshot: Value) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Option<Value> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> SessionResult<Option<Value>> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &Value) -> SessionResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
