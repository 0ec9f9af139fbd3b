//! # Watchdog: a single-outstanding deadline.
//!
//! [`Watchdog`] holds zero or one pending timer. Arming replaces any
//! previous pending deadline atomically — the old timer task is aborted
//! before the new one is spawned — so duplicate timeouts cannot exist by
//! construction. The armed future typically submits a timeout event through
//! the normal bus path:
//!
//! ```text
//! watchdog.arm(delay, { bus.submit(ConnectionTimeout) })
//!           │
//!           ├─ success event arrives first → watchdog.cancel()
//!           └─ delay elapses → timeout event → module state machine
//!                              (state guards drop it if it is stale)
//! ```
//!
//! A watchdog that fires after the condition it guarded has resolved
//! produces a spurious timeout event; receivers filter those through their
//! state guards, so firing late is harmless but cancelled timers never fire
//! at all.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Zero-or-one pending deadline, owned by one module.
pub struct Watchdog {
    owner: &'static str,
    pending: Option<JoinHandle<()>>,
}

impl Watchdog {
    /// Creates an idle watchdog for `owner` (used in logs).
    pub fn new(owner: &'static str) -> Self {
        Self {
            owner,
            pending: None,
        }
    }

    /// Arms the watchdog: after `delay`, `on_timeout` runs. Any previously
    /// pending deadline is cancelled first.
    pub fn arm<F>(&mut self, delay: Duration, on_timeout: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        debug!(module = self.owner, ?delay, "watchdog armed");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_timeout.await;
        }));
    }

    /// Cancels the pending deadline, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            debug!(module = self.owner, "watchdog cancelled");
        }
    }

    /// True while a deadline is pending and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.cancel();
    }
}
