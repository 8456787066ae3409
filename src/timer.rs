//! Per-match turn countdown.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Seconds the active participant has to move.
pub const TURN_SECONDS: u64 = 30;

/// Revocable handle to a pending turn countdown.
///
/// The countdown runs as a spawned task; aborting the task is the
/// cancellation mechanism, so a canceled countdown can never reach its
/// expiry path. The expiry future must re-acquire the coordinator lock
/// before touching match state, which makes that acquisition the abort
/// point for a cancellation issued while the lock is held.
///
/// Dropping the handle cancels the countdown. At most one handle exists per
/// match; replacing it cancels the previous countdown.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawns a single-shot countdown that awaits `expire` after the fixed
    /// turn duration.
    pub fn spawn<F>(expire: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(TURN_SECONDS)).await;
            expire.await;
        });
        Self { task }
    }

    /// Cancels the countdown; the expiry future will not run.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
