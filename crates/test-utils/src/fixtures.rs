#![allow(dead_code)]

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use filetail::fs::mock::MockFileSystem;
use filetail::{WatchOptions, Watcher};
use filetime::FileTime;
use tempfile::TempDir;

/// A log file in its own temp directory with a hand-driven modification time.
///
/// The file starts an hour in the past and every `append`/`touch` moves its
/// mtime forward by exactly one second, so change detection never depends on
/// filesystem timestamp granularity or on sleeping.
pub struct TempLog {
    _dir: TempDir,
    path: PathBuf,
    mtime: SystemTime,
}

impl TempLog {
    pub fn new() -> Result<Self> {
        Self::with_content("")
    }

    pub fn with_content(content: impl AsRef<[u8]>) -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp dir")?;
        let path = dir.path().join("app.log");
        fs::write(&path, content.as_ref()).with_context(|| format!("creating {:?}", path))?;

        let log = Self {
            _dir: dir,
            path,
            mtime: SystemTime::now() - Duration::from_secs(3600),
        };
        log.apply_mtime()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `bytes` and advance the mtime.
    pub fn append(&mut self, bytes: impl AsRef<[u8]>) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {:?} for append", self.path))?;
        file.write_all(bytes.as_ref())?;
        file.sync_all()?;
        drop(file);
        self.touch()
    }

    /// Advance the mtime without writing.
    pub fn touch(&mut self) -> Result<()> {
        self.mtime += Duration::from_secs(1);
        self.apply_mtime()
    }

    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path).with_context(|| format!("removing {:?}", self.path))
    }

    fn apply_mtime(&self) -> Result<()> {
        filetime::set_file_mtime(&self.path, FileTime::from_system_time(self.mtime))
            .with_context(|| format!("setting mtime on {:?}", self.path))
    }
}

/// Build a `Watcher` over an in-memory filesystem.
pub fn mock_watcher(
    fs: &MockFileSystem,
    path: impl Into<PathBuf>,
    chunk_size: usize,
) -> filetail::errors::Result<Watcher> {
    let options = WatchOptions::default()
        .with_filesystem(Arc::new(fs.clone()))
        .with_chunk_size(chunk_size);
    Watcher::with_options(path, options)
}
