//! Retry and timeout policies for connectivity-oriented modules.
//!
//! ## Contents
//! - [`RetryBackoff`] — table-driven attempt counter with a retry budget
//! - [`Jitter`] — randomization strategy to avoid thundering herd
//! - [`Watchdog`] — single-outstanding timer synthesizing timeout events
//!
//! ## Quick wiring
//! ```text
//! connect():  retry.next()? → issue attempt → watchdog.arm(delay, submit timeout)
//! success:    retry.reset(); watchdog.cancel()
//! exhausted:  emit terminal error event, stop
//! ```

mod backoff;
mod jitter;
mod watchdog;

pub use backoff::{RetryBackoff, DEFAULT_CONNECT_BACKOFF};
pub use jitter::Jitter;
pub use watchdog::Watchdog;
