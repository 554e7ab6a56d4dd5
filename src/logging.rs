// src/logging.rs

//! Diagnostics for the `filetail` binary.
//!
//! stdout belongs to the tailed file: every byte written there is a byte that
//! was appended to the watched file. Everything else (watch start, monitor
//! start/stop, lost-file and retry warnings, per-poll debug records with
//! `path`/`offset`/`bytes` fields) goes to stderr through `tracing`.
//!
//! The level comes from `--log-level`, else `FILETAIL_LOG`, else `info`. An
//! unrecognised `FILETAIL_LOG` value is ignored rather than rejected, so a
//! typo never stops a tail from starting.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Env var consulted when `--log-level` is not given.
pub const LOG_ENV_VAR: &str = "FILETAIL_LOG";

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber. Call once, before the watcher is built.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = effective_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

fn effective_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .map(Level::from)
        .or_else(|| env_value.and_then(level_from_env))
        .unwrap_or(Level::INFO)
}

fn level_from_env(value: &str) -> Option<Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "warning" => Some(Level::WARN),
        other => other.parse().ok(),
    }
}
