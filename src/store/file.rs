//! File-backed session storage.
//!
//! Stores the session as pretty-printed JSON. On unix the file is created with
//! `0600` permissions since it holds a bearer token.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::session::Session;

use super::error::{StorageError, StorageResult};
use super::session::SessionStore;

/// File-based implementation of `SessionStore`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store at `path`. Parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        let path = &self.path;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::file_io(parent, e))?;
        }

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .map_err(|e| StorageError::file_io(path, e))?;
            let mut writer = std::io::BufWriter::new(file);
            writer
                .write_all(contents.as_bytes())
                .map_err(|e| StorageError::file_io(path, e))?;
            let file = writer
                .into_inner()
                .map_err(|e| StorageError::file_io(path, e.into_error()))?;
            file.sync_all()
                .map_err(|e| StorageError::file_io(path, e))?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, contents).map_err(|e| StorageError::file_io(path, e))?;
        }

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StorageResult<Option<Session>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::file_io(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| StorageError::file_deserialization(&self.path, e.to_string()))
    }

    fn save(&self, session: &Session) -> StorageResult<()> {
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        self.write(&contents)
    }

    fn clear(&self) -> StorageResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::file_io(&self.path, e)),
        }
    }
}
