mod common;
use crate::common::{init_tracing, with_timeout, TempLog};

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use filetail::cli::CliArgs;
use filetail::config::ConfigFile;
use filetail::fs::mock::MockFileSystem;
use filetail::{follow, resolve_config, ErrorKind, Watcher};
use filetail_test_utils::mock_watcher;

type TestResult = Result<(), Box<dyn Error>>;

/// Resolve settings against an empty config file so a stray `Filetail.toml`
/// in the working directory cannot leak in.
fn settings(log: &TempLog, extra: &[&str]) -> Result<ConfigFile, Box<dyn Error>> {
    let empty = NamedTempFile::new()?;
    let config_arg = empty.path().to_string_lossy().to_string();
    let path_arg = log.path().to_string_lossy().to_string();

    let mut argv = vec!["filetail", path_arg.as_str(), "--config", config_arg.as_str()];
    argv.extend_from_slice(extra);

    Ok(resolve_config(&CliArgs::parse_from(argv))?)
}

#[tokio::test]
async fn once_prints_current_content() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("hello\nworld\n")?;
    let cfg = settings(&log, &["--once"])?;

    let mut out = Vec::new();
    follow(Watcher::new(log.path())?, &cfg, true, &mut out, std::future::pending()).await?;
    assert_eq!(out, b"hello\nworld\n");
    Ok(())
}

#[tokio::test]
async fn once_without_from_start_prints_nothing() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("old stuff\n")?;
    let cfg = settings(&log, &["--no-from-start"])?;

    let mut out = Vec::new();
    follow(Watcher::new(log.path())?, &cfg, true, &mut out, std::future::pending()).await?;
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn pull_loop_stops_on_shutdown() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("line 1\n")?;
    let cfg = settings(&log, &["--mode", "pull", "--interval", "1"])?;

    let mut out = Vec::new();
    let shutdown = tokio::time::sleep(Duration::from_millis(300));
    with_timeout(follow(Watcher::new(log.path())?, &cfg, false, &mut out, shutdown)).await?;

    // The first tick fires immediately and picks up the existing content.
    assert_eq!(out, b"line 1\n");
    Ok(())
}

#[tokio::test]
async fn push_loop_fails_when_file_is_lost() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("before\n")?;
    let cfg = settings(&log, &["--mode", "push", "--interval", "1"])?;
    let watcher = Watcher::new(log.path())?;
    log.remove()?;

    let mut out = Vec::new();
    let err = with_timeout(follow(watcher, &cfg, false, &mut out, std::future::pending()))
        .await
        .unwrap_err();

    let tail_err = err
        .downcast_ref::<filetail::errors::TailError>()
        .expect("TailError");
    assert_eq!(tail_err.kind(), ErrorKind::FileLost);
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn push_loop_writes_deliveries_until_shutdown() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("first\n")?;
    let cfg = settings(&log, &["--mode", "push", "--interval", "1"])?;

    let mut out = Vec::new();
    let shutdown = tokio::time::sleep(Duration::from_millis(1500));
    with_timeout(follow(Watcher::new(log.path())?, &cfg, false, &mut out, shutdown)).await?;

    assert_eq!(out, b"first\n");
    Ok(())
}

#[tokio::test]
async fn push_loop_survives_a_transient_read_error() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file("app.log", "abc\n");
    fs.fail_reads_at("app.log", Some(1));
    let watcher = mock_watcher(&fs, "app.log", 4)?;

    let log = TempLog::with_content("")?;
    let cfg = settings(&log, &["--mode", "push", "--interval", "1"])?;

    // First tick at 1s fails; the fault is cleared before the second tick,
    // which re-reads the file even though its timestamp did not move.
    let faults = fs.clone();
    let shutdown = async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        faults.fail_reads_at("app.log", None);
        tokio::time::sleep(Duration::from_millis(1500)).await;
    };

    let mut out = Vec::new();
    with_timeout(follow(watcher, &cfg, false, &mut out, shutdown)).await?;

    assert_eq!(out, b"abc\n");
    Ok(())
}
