//! # Jitter for retry delays.
//!
//! [`Jitter`] randomizes backoff delays so that a fleet of devices losing
//! connectivity at the same moment does not retry in lockstep.
//!
//! - [`Jitter::None`] — exact table delay (default; keeps tests and single
//!   devices deterministic)
//! - [`Jitter::Full`] — random delay in `[0, delay]`
//! - [`Jitter::Equal`] — `delay/2 + random[0, delay/2]`

use std::time::Duration;

use rand::Rng;

/// Randomization strategy applied to a table delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Jitter {
    /// No jitter: use the exact table delay.
    #[default]
    None,
    /// Random delay in `[0, delay]`. Maximum load spreading.
    Full,
    /// `delay/2 + random[0, delay/2]`. Preserves most of the delay while
    /// still decorrelating retries.
    Equal,
}

impl Jitter {
    /// Applies this policy to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Full => Self::full(delay),
            Jitter::Equal => Self::equal(delay),
        }
    }

    /// Full jitter: `random[0, delay]`.
    fn full(delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::rng();
        Duration::from_millis(rng.random_range(0..=ms))
    }

    /// Equal jitter: `delay/2 + random[0, delay/2]`.
    fn equal(delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        let half = ms / 2;
        let mut rng = rand::rng();
        let jitter = if half == 0 {
            0
        } else {
            rng.random_range(0..=half)
        };
        Duration::from_millis(half + jitter)
    }
}
