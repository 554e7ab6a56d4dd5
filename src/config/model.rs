// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::tail::DEFAULT_CHUNK_SIZE;
use crate::types::WatchMode;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// path = "/var/log/app.log"
/// mode = "push"
/// interval_secs = 1
/// chunk_size = 32768
/// from_start = true
/// ```
///
/// All keys are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// File to tail. The CLI positional argument takes precedence.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// `"push"` (default) or `"pull"`.
    #[serde(default)]
    pub mode: WatchMode,

    /// Seconds between polls.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Buffer size for each read call.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Emit the content already in the file on the first poll.
    #[serde(default = "default_from_start")]
    pub from_start: bool,
}

fn default_interval_secs() -> u64 {
    1
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_from_start() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            path: None,
            mode: WatchMode::default(),
            interval_secs: default_interval_secs(),
            chunk_size: default_chunk_size(),
            from_start: default_from_start(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// `interval_secs` and `chunk_size` being non-zero.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection) -> Self {
        Self { watch }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.watch.path.as_ref()
    }

    pub fn mode(&self) -> WatchMode {
        self.watch.mode
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.watch.interval_secs)
    }

    pub fn chunk_size(&self) -> usize {
        self.watch.chunk_size
    }

    pub fn from_start(&self) -> bool {
        self.watch.from_start
    }
}
