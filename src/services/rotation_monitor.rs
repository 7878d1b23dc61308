//! Background rotation monitor
//!
//! A dedicated thread that runs a rotation check on a fixed tick, so a
//! size-bounded log is rotated even while nothing is being written.

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::domain::errors::{LoggerError, LoggerResult};

/// Default tick of the monitor
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running monitor thread.
///
/// The thread exits when [`stop`](Self::stop) is called or when the handle is
/// dropped, since dropping disconnects the cancellation channel.
#[derive(Debug)]
pub struct RotationMonitor {
    cancel: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl RotationMonitor {
    /// Spawn a thread calling `check` every `interval`
    pub fn spawn<F>(name: impl Into<String>, interval: Duration, check: F) -> LoggerResult<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (cancel, cancelled) = bounded(1);
        let name = name.into();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(&name, interval, &cancelled, check))
            .map_err(LoggerError::SpawnMonitor)?;

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it to exit
    pub fn stop(mut self) {
        // A full channel or a gone receiver both mean the thread is stopping already
        let _ = self.cancel.try_send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("rotation monitor thread panicked");
            }
        }
    }
}

fn run<F>(name: &str, interval: Duration, cancelled: &Receiver<()>, check: F)
where
    F: Fn(),
{
    let ticker = tick(interval);
    debug!(monitor = name, ?interval, "rotation monitor started");

    loop {
        select! {
            recv(cancelled) -> _ => break,
            recv(ticker) -> _ => {
                if panic::catch_unwind(AssertUnwindSafe(&check)).is_err() {
                    error!(monitor = name, "rotation check panicked");
                }
            }
        }
    }

    debug!(monitor = name, "rotation monitor stopped");
}
