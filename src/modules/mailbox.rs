//! # Module mailbox: bounded, ordered, single consumer.
//!
//! Each module owns one mailbox. Listeners copy relevant event payloads into
//! it from the producer's task; the module's actor drains it strictly one
//! message at a time. Ordering is FIFO regardless of which producer
//! enqueued, and [`Mailbox::next`] is the actor's sole suspension point.
//!
//! ## Overflow
//! Capacity is fixed at creation. What happens when it is exceeded is an
//! explicit per-module [`OverflowPolicy`]:
//! - `Wait(d)` — the producer blocks up to `d` for a slot (the behavior
//!   connectivity modules use), then fails with [`EnqueueError::Full`];
//! - `Fail` — the enqueue fails immediately.
//!
//! A failed enqueue drops the message **for this module only**; other
//! subscribers of the same event are unaffected.
//!
//! ## Forwarding listener
//! [`ForwardListener`] is the standard bus-to-mailbox glue: a mapping
//! function decides whether the event is relevant and, if so, which mailbox
//! message to copy out of it. Enqueue failures are logged and can optionally
//! be escalated as the module's own error event.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::config::{MailboxConfig, OverflowPolicy};
use crate::error::EnqueueError;
use crate::events::{Bus, Envelope, EventSet, Listen};

/// Creates a mailbox, returning the producer and consumer halves.
///
/// The sender half is cloneable and lives inside listeners; the [`Mailbox`]
/// half is owned exclusively by the module's actor.
pub fn mailbox<M: Send + 'static>(cfg: MailboxConfig) -> (MailboxSender<M>, Mailbox<M>) {
    let (tx, rx) = mpsc::channel(cfg.capacity_clamped());
    (
        MailboxSender {
            tx,
            overflow: cfg.overflow,
        },
        Mailbox { rx },
    )
}

/// Producer half of a module mailbox.
pub struct MailboxSender<M> {
    tx: mpsc::Sender<M>,
    overflow: OverflowPolicy,
}

impl<M> Clone for MailboxSender<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            overflow: self.overflow,
        }
    }
}

impl<M: Send + 'static> MailboxSender<M> {
    /// Copies a message into the tail slot, applying the configured overflow
    /// policy when the mailbox is full.
    pub async fn enqueue(&self, msg: M) -> Result<(), EnqueueError> {
        match self.overflow {
            OverflowPolicy::Wait(window) => {
                self.tx
                    .send_timeout(msg, window)
                    .await
                    .map_err(|err| match err {
                        mpsc::error::SendTimeoutError::Timeout(_) => EnqueueError::Full,
                        mpsc::error::SendTimeoutError::Closed(_) => EnqueueError::Closed,
                    })
            }
            OverflowPolicy::Fail => self.tx.try_send(msg).map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => EnqueueError::Full,
                mpsc::error::TrySendError::Closed(_) => EnqueueError::Closed,
            }),
        }
    }
}

/// Consumer half of a module mailbox; owned by exactly one actor.
pub struct Mailbox<M> {
    rx: mpsc::Receiver<M>,
}

impl<M> Mailbox<M> {
    /// Waits for the next message. Returns `None` once every sender is gone
    /// and the queue is drained.
    pub async fn next(&mut self) -> Option<M> {
        self.rx.recv().await
    }
}

/// Bus listener that forwards relevant events into a module mailbox.
///
/// `map` inspects the envelope and returns the mailbox message to enqueue,
/// or `None` when the event is irrelevant to this module (reported to the
/// bus as not consumed).
pub struct ForwardListener<E: EventSet, M: Send + 'static> {
    module: &'static str,
    sender: MailboxSender<M>,
    map: fn(&Envelope<E>) -> Option<M>,
    escalate: Option<fn(EnqueueError) -> E>,
    escalating: AtomicBool,
    bus: OnceLock<Bus<E>>,
}

impl<E: EventSet, M: Send + 'static> ForwardListener<E, M> {
    /// Creates a forwarding listener for `module`'s mailbox.
    pub fn new(
        module: &'static str,
        sender: MailboxSender<M>,
        map: fn(&Envelope<E>) -> Option<M>,
    ) -> Self {
        Self {
            module,
            sender,
            map,
            escalate: None,
            escalating: AtomicBool::new(false),
            bus: OnceLock::new(),
        }
    }

    /// Escalates enqueue failures by submitting the event `build` produces
    /// (typically the module's own error event). Best effort: if the
    /// escalation event itself fails to enqueue anywhere, it is not
    /// escalated again.
    pub fn with_escalation(mut self, build: fn(EnqueueError) -> E) -> Self {
        self.escalate = Some(build);
        self
    }
}

#[async_trait]
impl<E: EventSet, M: Send + 'static> Listen<E> for ForwardListener<E, M> {
    async fn on_event(&self, envelope: &Envelope<E>) -> bool {
        let Some(msg) = (self.map)(envelope) else {
            return false;
        };

        match self.sender.enqueue(msg).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    module = self.module,
                    event = envelope.event_type().name(),
                    %err,
                    "message could not be enqueued"
                );
                if let (Some(build), Some(bus)) = (self.escalate, self.bus.get()) {
                    // Guard against the escalation event feeding back into
                    // the same full mailbox forever.
                    if self
                        .escalating
                        .compare_exchange(
                            false,
                            true,
                            AtomicOrdering::SeqCst,
                            AtomicOrdering::SeqCst,
                        )
                        .is_ok()
                    {
                        if let Err(bus_err) = bus.submit(build(err)).await {
                            warn!(module = self.module, %bus_err, "escalation submit failed");
                        }
                        self.escalating.store(false, AtomicOrdering::SeqCst);
                    }
                }
                true
            }
        }
    }

    fn name(&self) -> &'static str {
        self.module
    }

    fn bind(&self, bus: &Bus<E>) {
        let _ = self.bus.set(bus.clone());
    }
}
