//! Run a task after a fixed delay, unless a newer one replaces it

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// At most one pending delayed task
///
/// Scheduling a new task cancels the pending one. Dropping the `Deferred`
/// cancels whatever is still pending.
#[derive(Debug)]
pub struct Deferred {
    delay: Duration,
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    /// sending or dropping wakes the worker before its deadline
    cancel: mpsc::Sender<()>,
    /// whether the task ran
    worker: thread::JoinHandle<bool>,
}

impl Deferred {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Run `task` in the background once the delay has elapsed
    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            tracing::debug!("pending display replaced");
        }
        let (cancel, wakeup) = mpsc::channel();
        let delay = self.delay;
        let worker = thread::spawn(move || match wakeup.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {
                task();
                true
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        });
        self.pending = Some(Pending { cancel, worker });
    }

    /// Stop the pending task if it has not started yet
    ///
    /// Returns `true` if a task was prevented from running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(Pending { cancel, worker }) => {
                // the worker may already be gone, in which case it ran
                let _ = cancel.send(());
                !worker.join().unwrap_or(true)
            }
            None => false,
        }
    }

    /// Wait until the pending task has run
    ///
    /// Returns `true` if there was a task and it ran.
    pub fn finish(&mut self) -> bool {
        match self.pending.take() {
            Some(Pending { cancel, worker }) => {
                let ran = worker.join().unwrap_or(false);
                drop(cancel);
                ran
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}
