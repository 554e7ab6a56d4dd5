// src/fs/mock.rs

use super::{FileSystem, ReadSeek};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
    deny_open: bool,
    // Absolute byte position at which reads start failing.
    fail_reads_at: Option<u64>,
}

/// In-memory filesystem with a manual clock.
///
/// Every write advances the clock by one second, so modification times are
/// strictly increasing and tests never need to sleep.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockFile>>>,
    clock: Arc<Mutex<SystemTime>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(Mutex::new(
                SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            )),
        }
    }

    fn tick(&self) -> SystemTime {
        let mut clock = self.clock.lock().unwrap();
        *clock += Duration::from_secs(1);
        *clock
    }

    /// Create (or replace) a file.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let modified = self.tick();
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.as_ref().to_path_buf(),
            MockFile {
                content: content.into(),
                modified,
                deny_open: false,
                fail_reads_at: None,
            },
        );
    }

    /// Append bytes and bump the modification time.
    pub fn append(&self, path: impl AsRef<Path>, bytes: impl AsRef<[u8]>) {
        let modified = self.tick();
        let mut files = self.files.lock().unwrap();
        let file = files
            .get_mut(path.as_ref())
            .unwrap_or_else(|| panic!("mock file {:?} does not exist", path.as_ref()));
        file.content.extend_from_slice(bytes.as_ref());
        file.modified = modified;
    }

    /// Append bytes without touching the modification time.
    pub fn append_silently(&self, path: impl AsRef<Path>, bytes: impl AsRef<[u8]>) {
        let mut files = self.files.lock().unwrap();
        if let Some(file) = files.get_mut(path.as_ref()) {
            file.content.extend_from_slice(bytes.as_ref());
        }
    }

    /// Bump the modification time without changing content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let modified = self.tick();
        let mut files = self.files.lock().unwrap();
        if let Some(file) = files.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn set_modified(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let mut files = self.files.lock().unwrap();
        if let Some(file) = files.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    /// Make `open_read` fail with `PermissionDenied` while keeping the file
    /// visible to `modified`.
    pub fn deny_open(&self, path: impl AsRef<Path>, deny: bool) {
        let mut files = self.files.lock().unwrap();
        if let Some(file) = files.get_mut(path.as_ref()) {
            file.deny_open = deny;
        }
    }

    /// Make reads fail once the handle reaches absolute byte `position`.
    /// `None` clears the fault.
    pub fn fail_reads_at(&self, path: impl AsRef<Path>, position: Option<u64>) {
        let mut files = self.files.lock().unwrap();
        if let Some(file) = files.get_mut(path.as_ref()) {
            file.fail_reads_at = position;
        }
    }

    pub fn file_len(&self, path: impl AsRef<Path>) -> Option<usize> {
        let files = self.files.lock().unwrap();
        files.get(path.as_ref()).map(|f| f.content.len())
    }
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(file) => Ok(file.modified),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn ReadSeek>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(file) if file.deny_open => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {:?}", path),
            )),
            Some(file) => Ok(Box::new(MockReader {
                inner: Cursor::new(file.content.clone()),
                fail_at: file.fail_reads_at,
            })),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {:?}", path),
            )),
        }
    }
}

/// Snapshot reader that can be told to fail at a given position.
struct MockReader {
    inner: Cursor<Vec<u8>>,
    fail_at: Option<u64>,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.fail_at {
            Some(limit) => {
                let pos = self.inner.position();
                if pos >= limit {
                    return Err(io::Error::other("injected read failure"));
                }
                let allowed = usize::try_from(limit - pos).unwrap_or(usize::MAX);
                let end = buf.len().min(allowed);
                self.inner.read(&mut buf[..end])
            }
            None => self.inner.read(buf),
        }
    }
}

impl Seek for MockReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_advance_the_clock() {
        let fs = MockFileSystem::new();
        fs.add_file("a.log", "one");
        let first = fs.modified(Path::new("a.log")).unwrap();
        fs.append("a.log", "two");
        let second = fs.modified(Path::new("a.log")).unwrap();
        assert!(second > first);
        assert_eq!(fs.file_len("a.log"), Some(6));
    }

    #[test]
    fn injected_failure_hits_at_position() {
        let fs = MockFileSystem::new();
        fs.add_file("a.log", "0123456789");
        fs.fail_reads_at("a.log", Some(4));

        let mut handle = fs.open_read(Path::new("a.log")).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(handle.read(&mut buf).unwrap(), 4);
        assert!(handle.read(&mut buf).is_err());
    }

    #[test]
    fn denied_file_still_has_status() {
        let fs = MockFileSystem::new();
        fs.add_file("a.log", "x");
        fs.deny_open("a.log", true);
        assert!(fs.modified(Path::new("a.log")).is_ok());
        let err = fs.open_read(Path::new("a.log")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
