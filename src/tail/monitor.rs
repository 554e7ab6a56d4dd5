// src/tail/monitor.rs

//! Push mode: a background task that polls a [`Watcher`] on a fixed interval
//! and delivers new bytes (or errors) over single-slot queues.
//!
//! The task owns the watcher outright, so nothing else can mutate its cursor
//! while it runs. Callers only see the two receivers and a stop control.
//!
//! Delivery rules per tick:
//! - new bytes: one item on the bytes queue
//! - nothing new: no delivery
//! - error: the error on the error queue, then an empty buffer on the bytes
//!   queue so a consumer that only reads bytes still wakes up
//!
//! Both queues hold at most one unconsumed item; the task waits on a full
//! queue, which throttles polling to the consumer's pace.

use std::fmt;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::{Result, TailError};
use crate::tail::watcher::Watcher;

/// Capacity of both delivery queues.
pub const QUEUE_CAPACITY: usize = 1;

/// Handle to a running push-mode watcher.
///
/// Dropping the handle stops the background task at its next suspension
/// point.
pub struct MonitorHandle {
    bytes_rx: mpsc::Receiver<Vec<u8>>,
    errors_rx: mpsc::Receiver<TailError>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl fmt::Debug for MonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorHandle")
            .field("finished", &self.task.is_finished())
            .finish_non_exhaustive()
    }
}

impl MonitorHandle {
    /// Wait for the next delivery on the bytes queue.
    ///
    /// Returns `None` once the background task has exited.
    pub async fn recv_bytes(&mut self) -> Option<Vec<u8>> {
        self.bytes_rx.recv().await
    }

    /// Wait for the next delivery on the error queue.
    pub async fn recv_error(&mut self) -> Option<TailError> {
        self.errors_rx.recv().await
    }

    /// Take a pending error without waiting.
    pub fn try_recv_error(&mut self) -> Option<TailError> {
        self.errors_rx.try_recv().ok()
    }

    /// Borrow both receivers at once, e.g. to `select!` over them.
    pub fn receivers(
        &mut self,
    ) -> (&mut mpsc::Receiver<Vec<u8>>, &mut mpsc::Receiver<TailError>) {
        (&mut self.bytes_rx, &mut self.errors_rx)
    }

    /// Ask the background task to exit without waiting for it.
    pub fn request_stop(&mut self) {
        if let Some(stop) = self.stop_tx.take() {
            if stop.send(()).is_err() {
                debug!("monitor task already finished");
            }
        }
    }

    /// Stop the background task and wait for it to exit.
    pub async fn stop(mut self) {
        self.request_stop();
        if let Err(err) = (&mut self.task).await {
            warn!("monitor task ended abnormally: {err}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the polling task for `watcher`.
///
/// The first poll happens one `interval` after this call. Any non-zero
/// interval is accepted, including sub-second ones. Fails with
/// [`TailError::ConfigError`] for a zero interval and [`TailError::Other`]
/// when called outside a Tokio runtime.
pub fn spawn_monitor(watcher: Watcher, interval: Duration) -> Result<MonitorHandle> {
    if interval.is_zero() {
        return Err(TailError::ConfigError(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let runtime = tokio::runtime::Handle::try_current()
        .map_err(|err| anyhow::anyhow!("push mode requires a Tokio runtime: {err}"))?;

    let (bytes_tx, bytes_rx) = mpsc::channel::<Vec<u8>>(QUEUE_CAPACITY);
    let (errors_tx, errors_rx) = mpsc::channel::<TailError>(QUEUE_CAPACITY);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let task = runtime.spawn(run_monitor(watcher, interval, bytes_tx, errors_tx, stop_rx));

    Ok(MonitorHandle {
        bytes_rx,
        errors_rx,
        stop_tx: Some(stop_tx),
        task,
    })
}

enum Delivery {
    Sent,
    Stopped,
    Closed,
}

async fn run_monitor(
    mut watcher: Watcher,
    interval: Duration,
    bytes_tx: mpsc::Sender<Vec<u8>>,
    errors_tx: mpsc::Sender<TailError>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let path = watcher.path().display().to_string();
    info!(path = %path, ?interval, "monitor started");

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {}
        }

        // File IO is synchronous; run it on the blocking pool and take the
        // watcher back afterwards.
        let poll = tokio::task::spawn_blocking(move || {
            let result = watcher.get_new_bytes();
            (watcher, result)
        });

        let result = tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            joined = poll => match joined {
                Ok((returned, result)) => {
                    watcher = returned;
                    result
                }
                Err(err) => {
                    warn!(path = %path, "poll task failed: {err}");
                    break;
                }
            },
        };

        let delivery = match result {
            Ok(bytes) if bytes.is_empty() => continue,
            Ok(bytes) => {
                debug!(path = %path, bytes = bytes.len(), "delivering new bytes");
                deliver(&bytes_tx, bytes, &mut stop_rx).await
            }
            Err(err) => {
                debug!(path = %path, error = %err, "delivering error");
                match deliver(&errors_tx, err, &mut stop_rx).await {
                    Delivery::Sent => deliver(&bytes_tx, Vec::new(), &mut stop_rx).await,
                    other => other,
                }
            }
        };

        match delivery {
            Delivery::Sent => {}
            Delivery::Stopped => break,
            Delivery::Closed => {
                debug!(path = %path, "consumer dropped a queue; stopping");
                break;
            }
        }
    }

    info!(path = %path, "monitor stopped");
}

/// Push `item`, waiting for a free slot unless a stop is requested first.
async fn deliver<T>(
    tx: &mpsc::Sender<T>,
    item: T,
    stop_rx: &mut oneshot::Receiver<()>,
) -> Delivery {
    tokio::select! {
        biased;
        _ = stop_rx => Delivery::Stopped,
        sent = tx.send(item) => match sent {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Closed,
        },
    }
}
