//! Single-slot cancellable debounce timer
//!
//! Every call to [`DebounceTimer::schedule`] aborts the pending callback and
//! arms a new one, so the last call before the delay elapses is the only one
//! that fires.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Default quiet period before a query is considered settled
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Latest-wins delayed callback
#[derive(Debug)]
pub struct DebounceTimer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `on_fire` after the delay unless another call supersedes it.
    ///
    /// Outside a tokio runtime there is nothing to drive the timer, so the
    /// callback runs immediately.
    pub fn schedule<F>(&mut self, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let Ok(handle) = Handle::try_current() else {
            debug!("No runtime available, settling debounced value immediately");
            on_fire();
            return;
        };

        let deadline = Instant::now() + self.delay;
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_fire();
        }));
    }

    /// Abort the pending callback, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Whether a callback is armed and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Default for DebounceTimer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
