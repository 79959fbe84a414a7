use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

// One worker thread shared by every timer in the process. Pending timers are
// tasks on it, so a cancelled timer is aborted instead of left sleeping.
static TIMER_RUNTIME: Lazy<Option<Runtime>> = Lazy::new(|| {
    match Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("herald-timer")
        .enable_time()
        .build()
    {
        Ok(runtime) => Some(runtime),
        Err(err) => {
            tracing::warn!(%err, "inactivity timers disabled: runtime unavailable");
            None
        }
    }
});

/// A single cancelable deferred callback. Arming cancels whatever was pending,
/// so at most one callback is ever outstanding.
///
/// Callbacks run on a dedicated timer runtime, independent of any runtime the
/// caller happens to be inside.
#[derive(Default)]
pub struct InactivityTimer {
    pending: Option<JoinHandle<()>>,
}

impl InactivityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_expire` after `after`. A zero duration only cancels.
    pub fn arm<F>(&mut self, after: Duration, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        if after.is_zero() {
            return;
        }

        let Some(runtime) = TIMER_RUNTIME.as_ref() else {
            return;
        };
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(after).await;
            on_expire();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
