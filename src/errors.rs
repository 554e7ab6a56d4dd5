// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every error raised while tailing carries the path of the watched file, so
//! callers can branch on [`TailError::kind`] instead of matching on the
//! rendered message.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TailError {
    /// The status lookup on the watched file failed. Sticky for the lifetime
    /// of the watcher that raised it.
    #[error("file {} is no longer accessible", path.display())]
    FileLost { path: PathBuf },

    /// The file could not be opened (or stat'ed at construction time).
    #[error("failed to open {}: {source}", path.display())]
    OpenError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Seeking or reading failed part-way through a delta read.
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification of a [`TailError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileLost,
    Open,
    Read,
    Config,
    Io,
    Other,
}

impl TailError {
    pub fn lost(path: impl Into<PathBuf>) -> Self {
        TailError::FileLost { path: path.into() }
    }

    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TailError::OpenError {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TailError::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TailError::FileLost { .. } => ErrorKind::FileLost,
            TailError::OpenError { .. } => ErrorKind::Open,
            TailError::ReadError { .. } => ErrorKind::Read,
            TailError::ConfigError(_) | TailError::TomlError(_) => ErrorKind::Config,
            TailError::IoError(_) => ErrorKind::Io,
            TailError::Other(_) => ErrorKind::Other,
        }
    }

    /// The watched file this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            TailError::FileLost { path }
            | TailError::OpenError { path, .. }
            | TailError::ReadError { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether every later operation on the same watcher will fail the same way.
    pub fn is_sticky(&self) -> bool {
        self.kind() == ErrorKind::FileLost
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TailError>;
