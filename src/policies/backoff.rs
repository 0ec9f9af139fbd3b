//! # Table-driven retry backoff.
//!
//! [`RetryBackoff`] walks a static ordered table mapping the attempt count to
//! a delay, against a configured retry budget. Connectivity modules drive it
//! from their state machines:
//!
//! ```text
//! connect():
//!   retry.next()
//!     ├─ Ok(delay)        → issue attempt, arm watchdog for `delay`
//!     └─ Err(Exhausted)   → emit terminal error event, stop retrying
//!
//! on success event  → retry.reset(), watchdog.cancel()
//! on timeout event  → connect()            (next table entry)
//! ```
//!
//! The table is pure data; `next` never sleeps. If the table is shorter than
//! the budget, the last entry repeats.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use modactor::{RetryBackoff, RetryError};
//!
//! static TABLE: [Duration; 3] = [
//!     Duration::from_secs(32),
//!     Duration::from_secs(64),
//!     Duration::from_secs(128),
//! ];
//!
//! let mut retry = RetryBackoff::new(&TABLE, 3);
//! assert_eq!(retry.next(), Ok(Duration::from_secs(32)));
//! assert_eq!(retry.next(), Ok(Duration::from_secs(64)));
//! assert_eq!(retry.next(), Ok(Duration::from_secs(128)));
//! assert_eq!(retry.next(), Err(RetryError::Exhausted { attempts: 3 }));
//! ```

use std::time::Duration;

use tracing::debug;

use crate::error::RetryError;

use super::jitter::Jitter;

/// Binary-scaling reconnect table used by the cloud connectivity modules:
/// 32 s doubling up to ~12 days, 15 entries.
pub static DEFAULT_CONNECT_BACKOFF: [Duration; 15] = [
    Duration::from_secs(32),
    Duration::from_secs(64),
    Duration::from_secs(128),
    Duration::from_secs(256),
    Duration::from_secs(512),
    Duration::from_secs(2048),
    Duration::from_secs(4096),
    Duration::from_secs(8192),
    Duration::from_secs(16384),
    Duration::from_secs(32768),
    Duration::from_secs(65536),
    Duration::from_secs(131072),
    Duration::from_secs(262144),
    Duration::from_secs(524288),
    Duration::from_secs(1048576),
];

/// Attempt counter plus delay table.
///
/// Owned exclusively by one module; the counter is only ever touched from
/// that module's own dispatch.
pub struct RetryBackoff {
    table: &'static [Duration],
    max_retries: u32,
    jitter: Jitter,
    attempts: u32,
}

impl RetryBackoff {
    /// Creates a helper over `table` with a budget of `max_retries`
    /// attempts and no jitter.
    pub fn new(table: &'static [Duration], max_retries: u32) -> Self {
        Self {
            table,
            max_retries,
            jitter: Jitter::None,
            attempts: 0,
        }
    }

    /// Applies `jitter` to every delay handed out.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Accounts for one attempt and returns the delay to arm the watchdog
    /// with, or [`RetryError::Exhausted`] once the budget is spent.
    ///
    /// After exhaustion every further call keeps returning the error; the
    /// caller decides when (if ever) to [`reset`](Self::reset).
    pub fn next(&mut self) -> Result<Duration, RetryError> {
        if self.table.is_empty() || self.attempts >= self.max_retries {
            return Err(RetryError::Exhausted {
                attempts: self.attempts,
            });
        }

        let index = (self.attempts as usize).min(self.table.len() - 1);
        let delay = self.jitter.apply(self.table[index]);
        self.attempts += 1;
        Ok(delay)
    }

    /// Resets the attempt counter after a successful connection.
    pub fn reset(&mut self) {
        if self.attempts != 0 {
            debug!(attempts = self.attempts, "retry counter reset");
        }
        self.attempts = 0;
    }

    /// Number of attempts issued since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// True once the budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SHORT: [Duration; 3] = [
        Duration::from_millis(100),
        Duration::from_millis(200),
        Duration::from_millis(400),
    ];

    #[test]
    fn walks_the_table_in_order() {
        let mut retry = RetryBackoff::new(&SHORT, 3);
        assert_eq!(retry.next(), Ok(Duration::from_millis(100)));
        assert_eq!(retry.next(), Ok(Duration::from_millis(200)));
        assert_eq!(retry.next(), Ok(Duration::from_millis(400)));
        assert_eq!(retry.attempts(), 3);
    }

    #[test]
    fn budget_exceeding_table_repeats_last_entry() {
        let mut retry = RetryBackoff::new(&SHORT, 5);
        for _ in 0..3 {
            retry.next().unwrap();
        }
        assert_eq!(retry.next(), Ok(Duration::from_millis(400)));
        assert_eq!(retry.next(), Ok(Duration::from_millis(400)));
        assert!(retry.is_exhausted());
    }

    #[test]
    fn exhaustion_is_sticky() {
        let mut retry = RetryBackoff::new(&SHORT, 1);
        retry.next().unwrap();

        assert_eq!(retry.next(), Err(RetryError::Exhausted { attempts: 1 }));
        assert_eq!(retry.next(), Err(RetryError::Exhausted { attempts: 1 }));
    }

    #[test]
    fn reset_restarts_the_table() {
        let mut retry = RetryBackoff::new(&SHORT, 2);
        retry.next().unwrap();
        retry.next().unwrap();
        assert!(retry.is_exhausted());

        retry.reset();
        assert_eq!(retry.attempts(), 0);
        assert_eq!(retry.next(), Ok(Duration::from_millis(100)));
    }

    #[test]
    fn empty_table_is_exhausted_immediately() {
        static EMPTY: [Duration; 0] = [];
        let mut retry = RetryBackoff::new(&EMPTY, 3);
        assert_eq!(retry.next(), Err(RetryError::Exhausted { attempts: 0 }));
    }

    #[test]
    fn default_table_scales_binary() {
        assert_eq!(DEFAULT_CONNECT_BACKOFF[0], Duration::from_secs(32));
        assert_eq!(DEFAULT_CONNECT_BACKOFF[4], Duration::from_secs(512));
        assert_eq!(DEFAULT_CONNECT_BACKOFF[14], Duration::from_secs(1048576));
    }

    #[test]
    fn full_jitter_stays_under_base() {
        let mut retry = RetryBackoff::new(&SHORT, 30).with_jitter(Jitter::Full);
        for _ in 0..3 {
            assert!(retry.next().unwrap() <= Duration::from_millis(400));
        }
    }
}
