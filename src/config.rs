//! Per-module and host-wide configuration.
//!
//! [`MailboxConfig`] is fixed at module creation time and never changes
//! afterwards; the overflow policy in particular is an **explicit** per-module
//! choice, not an inferred default shared by everyone.
//!
//! [`HostConfig`] holds the few runtime-wide knobs of the [`Host`](crate::Host).

use std::time::Duration;

/// What a mailbox does with a message when it is full.
///
/// Producers run inside the bus dispatch, on the submitting task, so whatever
/// happens here must stay bounded: either a bounded wait or an immediate
/// failure. Blocking indefinitely is not an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Wait up to the given duration for a slot to free, then fail with
    /// [`EnqueueError::Full`](crate::EnqueueError::Full).
    Wait(Duration),
    /// Fail immediately without waiting.
    Fail,
}

impl Default for OverflowPolicy {
    /// Returns `Wait(2s)`, the block-with-timeout behavior connectivity
    /// modules rely on.
    fn default() -> Self {
        OverflowPolicy::Wait(Duration::from_secs(2))
    }
}

/// Configuration of one module mailbox.
///
/// Capacity bounds how far a module may lag behind the bus before its
/// overflow policy kicks in. Sizing follows the module's event rate; a
/// handful of slots is usually enough because actors drain continuously.
#[derive(Clone, Copy, Debug)]
pub struct MailboxConfig {
    /// Number of message slots (minimum 1, clamped).
    pub capacity: usize,
    /// Behavior when all slots are occupied.
    pub overflow: OverflowPolicy,
}

impl MailboxConfig {
    /// Creates a config with the given capacity and the default overflow
    /// policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Returns the capacity clamped to a minimum of 1.
    #[inline]
    pub fn capacity_clamped(&self) -> usize {
        self.capacity.max(1)
    }
}

impl Default for MailboxConfig {
    /// Returns `capacity = 16`, `overflow = Wait(2s)`.
    fn default() -> Self {
        Self {
            capacity: 16,
            overflow: OverflowPolicy::default(),
        }
    }
}

/// Host-wide runtime configuration.
#[derive(Clone, Copy, Debug)]
pub struct HostConfig {
    /// Maximum time to wait for module actors to stop after a shutdown was
    /// requested. Actors still running past this window are reported as
    /// stuck via [`RuntimeError::GraceExceeded`](crate::RuntimeError::GraceExceeded)
    /// and aborted.
    pub grace: Duration,
}

impl Default for HostConfig {
    /// Returns `grace = 60s`.
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(60),
        }
    }
}
