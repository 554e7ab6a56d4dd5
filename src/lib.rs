// src/lib.rs

//! Incremental, stat-based tailing of a single file.
//!
//! The library core is [`Watcher`]: a cursor that notices modification-time
//! changes and hands out only the bytes appended since the previous read,
//! either on demand (pull mode) or from a background poller over bounded
//! queues (push mode, see [`MonitorHandle`]).

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod tail;
pub mod types;

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_from_path};
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::TailError;
use crate::types::WatchMode;

pub use crate::errors::ErrorKind;
pub use crate::tail::{spawn_monitor, MonitorHandle, WatchOptions, WatchState, Watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - watcher construction
/// - the pull or push loop writing to stdout
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let path = cfg
        .path()
        .cloned()
        .ok_or_else(|| anyhow!("no file to watch: pass PATH or set [watch].path"))?;

    let options = WatchOptions::default().with_chunk_size(cfg.chunk_size());
    let watcher = Watcher::with_options(&path, options)
        .with_context(|| format!("starting to watch {:?}", path))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    follow(watcher, &cfg, args.once, std::io::stdout(), shutdown).await
}

/// Merge the config file (explicit `--config`, else `Filetail.toml` if it
/// exists, else defaults) with CLI overrides and validate the result.
pub fn resolve_config(args: &CliArgs) -> errors::Result<ConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let default = default_config_path();
            if default.is_file() {
                load_from_path(&default)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    if let Some(path) = &args.path {
        raw.watch.path = Some(path.clone());
    }
    if let Some(mode) = args.mode {
        raw.watch.mode = mode;
    }
    if let Some(secs) = args.interval {
        raw.watch.interval_secs = secs;
    }
    if let Some(size) = args.chunk_size {
        raw.watch.chunk_size = size;
    }
    if args.no_from_start {
        raw.watch.from_start = false;
    }

    ConfigFile::try_from(raw)
}

/// Drive `watcher` according to `cfg`, writing every delta to `out` until
/// `shutdown` resolves or the file is lost.
pub async fn follow<W, S>(
    mut watcher: Watcher,
    cfg: &ConfigFile,
    once: bool,
    mut out: W,
    shutdown: S,
) -> Result<()>
where
    W: Write,
    S: Future<Output = ()>,
{
    if !cfg.from_start() {
        let skipped = watcher.get_new_bytes()?;
        debug!(bytes = skipped.len(), "skipped existing content");
    }

    if once {
        let bytes = watcher.get_new_bytes()?;
        write_bytes(&mut out, &bytes)?;
        return Ok(());
    }

    match cfg.mode() {
        WatchMode::Pull => tail_pull(watcher, cfg.interval(), &mut out, shutdown).await,
        WatchMode::Push => tail_push(watcher, cfg.interval(), &mut out, shutdown).await,
    }
}

async fn tail_pull<W: Write>(
    mut watcher: Watcher,
    interval: Duration,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(path = %watcher.path().display(), ?interval, "pull loop started");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        match watcher.get_new_bytes() {
            Ok(bytes) => write_bytes(out, &bytes)?,
            Err(err) if err.is_sticky() => return Err(err.into()),
            Err(err) => warn!(error = %err, "read failed; retrying on next poll"),
        }
    }
}

enum Next {
    Bytes(Vec<u8>),
    Error(TailError),
    Closed,
    Shutdown,
}

async fn tail_push<W: Write>(
    watcher: Watcher,
    interval: Duration,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);

    let mut handle = watcher.monitor(interval)?;

    let outcome = loop {
        let next = {
            let (bytes_rx, errors_rx) = handle.receivers();
            tokio::select! {
                _ = &mut shutdown => Next::Shutdown,
                Some(err) = errors_rx.recv() => Next::Error(err),
                bytes = bytes_rx.recv() => match bytes {
                    Some(bytes) => Next::Bytes(bytes),
                    None => Next::Closed,
                },
            }
        };

        match next {
            Next::Bytes(bytes) => write_bytes(out, &bytes)?,
            Next::Error(err) if err.is_sticky() => break Err(err.into()),
            Next::Error(err) => warn!(error = %err, "read failed; retrying on next poll"),
            Next::Closed => break Err(anyhow!("monitor task exited unexpectedly")),
            Next::Shutdown => {
                info!("shutdown requested");
                break Ok(());
            }
        }
    };

    handle.stop().await;
    outcome
}

fn write_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    out.write_all(bytes)?;
    out.flush()
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(cfg: &ConfigFile) {
    println!("filetail dry-run");
    match cfg.path() {
        Some(path) => println!("  path = {}", path.display()),
        None => println!("  path = <none>"),
    }
    println!("  mode = {:?}", cfg.mode());
    println!("  interval_secs = {}", cfg.interval().as_secs());
    println!("  chunk_size = {}", cfg.chunk_size());
    println!("  from_start = {}", cfg.from_start());

    debug!("dry-run complete (nothing watched)");
}
