// src/tail/mod.rs

//! Incremental tailing of a single file.
//!
//! This module is responsible for:
//! - Detecting changes by modification timestamp (`detector.rs`).
//! - Reading only the bytes appended since the last read (`reader.rs`).
//! - The pull-mode [`Watcher`] that combines the two (`watcher.rs`).
//! - The push-mode background poller and its queues (`monitor.rs`).
//!
//! It does **not** detect truncation, rotation or renames; offsets only ever
//! move forward.

pub mod detector;
pub mod monitor;
pub mod reader;
pub mod watcher;

pub use detector::{ModificationDetector, WatchState};
pub use monitor::{spawn_monitor, MonitorHandle, QUEUE_CAPACITY};
pub use reader::{ReadCursor, DEFAULT_CHUNK_SIZE};
pub use watcher::{WatchOptions, Watcher};
