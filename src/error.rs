//! Error types used by the bus, mailboxes, retry helpers and the host.
//!
//! Each enum covers one failure surface:
//!
//! - [`RegistryError`] — event-type registration problems (setup-time).
//! - [`BusError`] — event submission problems (programmer errors).
//! - [`EnqueueError`] — a mailbox refused a message (full or closed).
//! - [`RetryError`] — a retry budget ran out.
//! - [`RuntimeError`] — host-level shutdown failures.
//!
//! Recoverable failures (`EnqueueError`, `RetryError`) are absorbed by the
//! module that detected them and re-enter the system as that module's own
//! error event; they are never thrown across module boundaries.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while building the event type catalog.
///
/// Registration happens once, during process-wide setup. A failure here is a
/// programmer error and is not meant to be recovered at runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The same event type descriptor was registered twice.
    #[error("event type '{name}' registered twice")]
    DuplicateType {
        /// Name of the offending descriptor.
        name: &'static str,
    },
}

/// Errors raised by [`Bus::submit`](crate::Bus::submit).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The submitted event's type was never registered with the bus.
    ///
    /// This is a programmer error: every event type must be registered on the
    /// [`BusBuilder`](crate::BusBuilder) before the first submission.
    #[error("event type '{name}' was never registered")]
    UnknownEventType {
        /// Name of the unregistered descriptor.
        name: &'static str,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::UnknownEventType { .. } => "bus_unknown_event_type",
        }
    }
}

/// Errors raised when enqueueing a message into a module mailbox.
///
/// Surfaced to the forwarding listener, which logs it and may escalate it as
/// the module's own error event. The bus itself never fails on a full
/// mailbox; the event is simply dropped for that module.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The mailbox stayed full for the whole configured wait window.
    #[error("mailbox full")]
    Full,
    /// The receiving actor is gone; the mailbox will never drain.
    #[error("mailbox closed")]
    Closed,
}

/// Errors raised by [`RetryBackoff`](crate::RetryBackoff).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryError {
    /// The configured retry budget is spent.
    ///
    /// Terminal for the current connection cycle: the owning module emits a
    /// terminal error event and stops retrying. Recovery requires external
    /// intervention (e.g. the network coming back) followed by
    /// [`RetryBackoff::reset`](crate::RetryBackoff::reset).
    #[error("retry budget exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of attempts that were issued before exhaustion.
        attempts: u32,
    },
}

/// Errors raised by the [`Host`](crate::Host) runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some module actors were still
    /// running and had to be force-terminated.
    #[error("shutdown grace {grace:?} exceeded; stuck modules: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of modules that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}
