// src/tail/reader.rs

//! Offset-tracking delta reads.

use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{Result, TailError};
use crate::fs::FileSystem;

/// Default size of the buffer used for each `read` call.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Byte cursor into the watched file.
///
/// `offset` counts bytes already handed to the caller; `prior_offset` is the
/// value `offset` held before the most recent chunk was added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadCursor {
    offset: u64,
    prior_offset: u64,
}

impl ReadCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn prior_offset(&self) -> u64 {
        self.prior_offset
    }

    fn advance(&mut self, n: usize) {
        self.prior_offset = self.offset;
        self.offset += n as u64;
    }

    /// Read everything between the current offset and end-of-file.
    ///
    /// The file is reopened on every call. If a read fails part-way through,
    /// the cursor is restored to where it was when the call started and the
    /// partial bytes are discarded; the next call reads them again.
    pub fn read_delta(
        &mut self,
        fs: &dyn FileSystem,
        path: &Path,
        chunk_size: usize,
    ) -> Result<Vec<u8>> {
        let mut handle = fs
            .open_read(path)
            .map_err(|err| TailError::open(path, err))?;

        if self.offset > 0 {
            handle
                .seek(SeekFrom::Start(self.offset))
                .map_err(|err| TailError::read(path, err))?;
        }

        let checkpoint = self.clone();
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut contents = Vec::new();

        loop {
            match handle.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    self.advance(n);
                    contents.extend_from_slice(&buf[..n]);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        offset = self.offset,
                        discarded = contents.len(),
                        error = %err,
                        "read failed mid-stream; rolling back cursor"
                    );
                    *self = checkpoint;
                    return Err(TailError::read(path, err));
                }
            }
        }

        debug!(
            path = %path.display(),
            from = checkpoint.offset,
            to = self.offset,
            bytes = contents.len(),
            "delta read"
        );
        Ok(contents)
    }
}
