// src/fs/mod.rs

//! Filesystem seam used by the watcher.
//!
//! The watcher only ever needs two things from the filesystem: the
//! modification time of a path and a fresh, seekable read handle. Keeping that
//! behind a trait lets the unit tests drive every branch (lost files, open
//! failures, mid-stream read failures) without touching the disk.

use std::fmt::Debug;
use std::fs;
use std::io::{self, Read, Seek};
use std::path::Path;
use std::time::SystemTime;

pub mod mock;

/// A readable, seekable handle.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Modification timestamp of `path`. Any error means the file's status
    /// could not be determined.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Open `path` for reading, positioned at the start of the file.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }
}
