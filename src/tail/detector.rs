// src/tail/detector.rs

//! Modification detection by modification timestamp.

use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::errors::{Result, TailError};
use crate::fs::FileSystem;

/// Lifecycle of a watched file.
///
/// `Lost` is terminal: once the status lookup fails, the watcher never looks
/// at the filesystem again and every check reports [`TailError::FileLost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Active,
    Lost,
}

#[derive(Debug, Clone)]
pub struct ModificationDetector {
    initial_modified: SystemTime,
    last_modified: SystemTime,
    state: WatchState,
}

impl ModificationDetector {
    pub fn new(initial_modified: SystemTime) -> Self {
        Self {
            initial_modified,
            last_modified: initial_modified,
            state: WatchState::Active,
        }
    }

    pub fn initial_modified(&self) -> SystemTime {
        self.initial_modified
    }

    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Stat `path` and report whether it changed since the last observed
    /// modification.
    pub fn check(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<bool> {
        if self.state == WatchState::Lost {
            return Err(TailError::lost(path));
        }

        match fs.modified(path) {
            Ok(current) => Ok(self.observe(current)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "watched file lost");
                self.state = WatchState::Lost;
                Err(TailError::lost(path))
            }
        }
    }

    /// Record `current` if it is strictly newer than everything seen so far.
    pub fn observe(&mut self, current: SystemTime) -> bool {
        let baseline = self.initial_modified.max(self.last_modified);
        if current > baseline {
            debug!(?current, ?baseline, "modification detected");
            self.last_modified = current;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::fs::mock::MockFileSystem;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn only_strictly_newer_timestamps_count() {
        let mut det = ModificationDetector::new(at(100));
        assert!(!det.observe(at(100)));
        assert!(!det.observe(at(99)));
        assert!(det.observe(at(101)));
        assert!(!det.observe(at(101)));
        assert_eq!(det.last_modified(), at(101));
        assert_eq!(det.initial_modified(), at(100));
    }

    #[test]
    fn clock_going_backwards_does_not_lower_last_modified() {
        let mut det = ModificationDetector::new(at(100));
        assert!(det.observe(at(200)));
        assert!(!det.observe(at(150)));
        assert_eq!(det.last_modified(), at(200));
    }

    #[test]
    fn lost_is_sticky_even_if_file_returns() {
        let fs = MockFileSystem::new();
        let path = Path::new("app.log");
        fs.add_file(path, "x");
        let mut det = ModificationDetector::new(fs.modified(path).unwrap());

        fs.remove(path);
        let err = det.check(&fs, path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileLost);
        assert_eq!(det.state(), WatchState::Lost);

        fs.add_file(path, "back again");
        let err = det.check(&fs, path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileLost);
        assert!(err.to_string().contains("no longer accessible"));
    }
}
