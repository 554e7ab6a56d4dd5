// src/tail/watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::errors::{Result, TailError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::tail::detector::{ModificationDetector, WatchState};
use crate::tail::monitor::{spawn_monitor, MonitorHandle};
use crate::tail::reader::{ReadCursor, DEFAULT_CHUNK_SIZE};

/// Construction options for a [`Watcher`].
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Size of the buffer used for each read call during a delta read.
    pub chunk_size: usize,
    /// Filesystem used for status lookups and reads.
    pub filesystem: Arc<dyn FileSystem>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            filesystem: Arc::new(RealFileSystem),
        }
    }
}

impl WatchOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_filesystem(mut self, filesystem: Arc<dyn FileSystem>) -> Self {
        self.filesystem = filesystem;
        self
    }
}

/// Incremental tail over a single file.
///
/// A `Watcher` is a pull-mode cursor: each call to [`Watcher::get_new_bytes`]
/// stats the file and returns whatever was appended since the previous
/// successful read. Call [`Watcher::monitor`] to hand it to a background task
/// that does the polling and delivers bytes over bounded queues instead.
pub struct Watcher {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    detector: ModificationDetector,
    cursor: ReadCursor,
    chunk_size: usize,
    // Set when a delta read failed after a detected change, so the next call
    // reads again even if the timestamp has not moved.
    retry_read: bool,
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("path", &self.path)
            .field("detector", &self.detector)
            .field("cursor", &self.cursor)
            .field("chunk_size", &self.chunk_size)
            .field("retry_read", &self.retry_read)
            .finish_non_exhaustive()
    }
}

impl Watcher {
    /// Watch `path` on the real filesystem with default options.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_options(path, WatchOptions::default())
    }

    /// Watch `path` with explicit options.
    ///
    /// Fails with [`TailError::OpenError`] if the file cannot be stat'ed now.
    pub fn with_options(path: impl Into<PathBuf>, options: WatchOptions) -> Result<Self> {
        let path = path.into();

        if options.chunk_size == 0 {
            return Err(TailError::ConfigError(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        let initial = options
            .filesystem
            .modified(&path)
            .map_err(|err| TailError::open(&path, err))?;

        info!(path = %path.display(), "watching file");

        Ok(Self {
            path,
            fs: options.filesystem,
            detector: ModificationDetector::new(initial),
            cursor: ReadCursor::new(),
            chunk_size: options.chunk_size,
            retry_read: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_offset(&self) -> u64 {
        self.cursor.offset()
    }

    pub fn prior_read_offset(&self) -> u64 {
        self.cursor.prior_offset()
    }

    pub fn initial_modified(&self) -> SystemTime {
        self.detector.initial_modified()
    }

    pub fn last_modified(&self) -> SystemTime {
        self.detector.last_modified()
    }

    pub fn state(&self) -> WatchState {
        self.detector.state()
    }

    pub fn is_lost(&self) -> bool {
        self.state() == WatchState::Lost
    }

    /// Report whether the file's modification time moved forward since the
    /// last observed change. Does not move the read cursor.
    pub fn was_modified(&mut self) -> Result<bool> {
        self.detector.check(self.fs.as_ref(), &self.path)
    }

    /// Read everything from the current offset to end-of-file, regardless of
    /// modification time.
    pub fn read_delta(&mut self) -> Result<Vec<u8>> {
        self.cursor
            .read_delta(self.fs.as_ref(), &self.path, self.chunk_size)
    }

    /// Return the bytes appended since the last successful read.
    ///
    /// An unchanged file yields an empty buffer, except before anything has
    /// been read: the first call always reads so the caller sees the initial
    /// content. A change whose read failed is retried on the next call.
    pub fn get_new_bytes(&mut self) -> Result<Vec<u8>> {
        let modified = self.was_modified()?;
        if !modified && !self.retry_read && self.cursor.offset() != 0 {
            return Ok(Vec::new());
        }

        debug!(
            path = %self.path.display(),
            modified,
            retry = self.retry_read,
            offset = self.cursor.offset(),
            "reading new bytes"
        );
        let result = self.read_delta();
        self.retry_read = result.is_err();
        result
    }

    /// Switch to push mode: spawn a background task that polls every
    /// `interval` and delivers new bytes over bounded queues.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn monitor(self, interval: Duration) -> Result<MonitorHandle> {
        spawn_monitor(self, interval)
    }
}
