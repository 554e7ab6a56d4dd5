// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::WatchMode;

/// Command-line arguments for `filetail`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "filetail",
    version,
    about = "Print bytes appended to a file, polling its modification time.",
    long_about = None
)]
pub struct CliArgs {
    /// File to tail. Overrides `[watch].path` from the config file.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Filetail.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Consumption mode: `push` (background poller) or `pull`.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<WatchMode>,

    /// Seconds between polls.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Read buffer size in bytes.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Print what the first read returns and exit.
    #[arg(long)]
    pub once: bool,

    /// Skip the content already in the file; only print what is appended.
    #[arg(long)]
    pub no_from_start: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FILETAIL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the effective settings without watching anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = CliArgs::parse_from([
            "filetail",
            "/var/log/app.log",
            "--mode",
            "pull",
            "--interval",
            "3",
            "--no-from-start",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(args.mode, Some(WatchMode::Pull));
        assert_eq!(args.interval, Some(3));
        assert!(args.no_from_start);
        assert!(!args.once);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(CliArgs::try_parse_from(["filetail", "--mode", "inotify"]).is_err());
    }
}
