//! # The `Module` trait: one mailbox, one state machine.
//!
//! A module is an owned struct holding its state registers
//! ([`StateCell`](crate::StateCell)s), whatever resources it exclusively
//! owns (retry helpers, watchdogs, peer maps), and a [`Bus`](crate::Bus)
//! handle for submitting its own events. The framework moves the struct into
//! its actor loop; nothing else can reach it afterwards — all cross-module
//! interaction goes through the bus.
//!
//! ## Dispatch contract
//! For every mailbox message the actor calls, in order:
//! 1. [`Module::on_state`] — the super-state handler. Implementations match
//!    on `(current state, message)`, branching further on a sub-state
//!    register where needed. A message irrelevant to the current state falls
//!    through the match and is silently dropped; there is no deferral or
//!    replay.
//! 2. [`Module::on_all_states`] — runs unconditionally, for behavior that is
//!    independent of state (e.g. reacting to a start event).
//!
//! Handler-local errors are not propagated out of the dispatch: convert them
//! into the module's own error event and submit it — the module's state
//! machine will see it like any other message.

use async_trait::async_trait;

/// A single-consumer execution unit driving one state machine.
#[async_trait]
pub trait Module: Send + 'static {
    /// Mailbox message type, typically a clone of the subscribed event
    /// payloads.
    type Msg: Send + Sync + 'static;

    /// Stable module name used in logs and stuck-module reports.
    fn name(&self) -> &'static str;

    /// Whether this module participates in cooperative shutdown.
    ///
    /// Opted-in actors observe the host's cancellation and exit between
    /// messages; everyone else runs until their mailbox closes and is
    /// reported stuck when a shutdown grace period expires.
    fn supports_shutdown(&self) -> bool {
        false
    }

    /// Super-state dispatch for one message.
    async fn on_state(&mut self, msg: &Self::Msg);

    /// Unconditional handler, invoked after [`on_state`](Self::on_state) for
    /// every message.
    async fn on_all_states(&mut self, msg: &Self::Msg) {
        let _ = msg;
    }
}
