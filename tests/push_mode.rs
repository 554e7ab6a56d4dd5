mod common;
use crate::common::{init_tracing, with_timeout, TempLog};

use std::error::Error;
use std::time::Duration;

use filetail::{spawn_monitor, ErrorKind, Watcher};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn delivers_appends_in_order_then_reports_loss() -> TestResult {
    init_tracing();

    let mut log = TempLog::with_content("first line")?;
    let watcher = Watcher::new(log.path())?;
    let mut handle = watcher.monitor(Duration::from_secs(1))?;

    let got = with_timeout(handle.recv_bytes()).await.expect("bytes");
    assert_eq!(String::from_utf8(got)?, "first line");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    log.append("second line")?;
    let got = with_timeout(handle.recv_bytes()).await.expect("bytes");
    assert_eq!(String::from_utf8(got)?, "second line");

    log.remove()?;
    let err = with_timeout(handle.recv_error()).await.expect("error");
    assert_eq!(err.kind(), ErrorKind::FileLost);
    assert!(err.to_string().contains("no longer accessible"));

    // The error is paired with an empty delivery on the bytes queue.
    let empty = with_timeout(handle.recv_bytes()).await.expect("bytes");
    assert!(empty.is_empty());

    handle.stop().await;
    Ok(())
}

#[tokio::test]
async fn quiet_file_produces_no_deliveries() -> TestResult {
    init_tracing();

    let log = TempLog::with_content("only this")?;
    let mut handle = spawn_monitor(Watcher::new(log.path())?, Duration::from_millis(50))?;

    assert_eq!(with_timeout(handle.recv_bytes()).await.expect("bytes"), b"only this");

    let nothing = tokio::time::timeout(Duration::from_millis(300), handle.recv_bytes()).await;
    assert!(nothing.is_err(), "unexpected delivery: {:?}", nothing);
    assert!(handle.try_recv_error().is_none());

    handle.stop().await;
    Ok(())
}

#[tokio::test]
async fn stop_ends_the_background_task() -> TestResult {
    init_tracing();

    let log = TempLog::new()?;
    let mut handle = Watcher::new(log.path())?.monitor(Duration::from_millis(50))?;
    assert!(!handle.is_finished());

    handle.request_stop();
    with_timeout(async {
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    // Queues close once the task is gone.
    assert!(handle.recv_bytes().await.is_none());
    Ok(())
}

#[tokio::test]
async fn zero_interval_is_a_config_error() -> TestResult {
    init_tracing();

    let log = TempLog::new()?;
    let err = Watcher::new(log.path())?
        .monitor(Duration::ZERO)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}
