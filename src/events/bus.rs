//! # Event bus: synchronous typed fan-out.
//!
//! [`Bus`] routes every submitted event to the listeners subscribed to its
//! type, **inline on the submitting task**. There is no router thread and no
//! intermediate queue: `submit` stamps an [`Envelope`], walks the matching
//! subscriptions in order, awaits each listener, and drops the envelope when
//! the last one has returned.
//!
//! ## Architecture
//! ```text
//! producer task ── submit(payload) ──► Bus
//!                                       │ envelope = header + payload
//!                                       ├─► EARLY  listener 1 ─► mailbox A
//!                                       ├─► EARLY  listener 2 ─► mailbox B
//!                                       ├─► NORMAL listener 3 ─► mailbox C
//!                                       └─► drop(envelope)
//! ```
//!
//! ## Rules
//! - **Ordering**: [`Tier::Early`] subscriptions run before [`Tier::Normal`];
//!   within a tier, subscription declaration order is preserved.
//! - **No short-circuit**: the `consumed` flag a listener returns is advisory
//!   (traced for diagnostics); dispatch always completes for all subscribers.
//! - **Bounded listeners**: a listener runs with the producer's stack and
//!   schedule. Its only allowed side effects are a bounded mailbox enqueue or
//!   a further (non-cyclic) `submit`.
//! - **Single owner**: the envelope belongs to the bus for the whole
//!   dispatch; listeners borrow it and must not retain references.
//!
//! Subscriptions are declared on [`BusBuilder`] and frozen by
//! [`BusBuilder::build`]; the table never changes at runtime, so dispatch
//! reads it without locks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, trace};

use crate::error::{BusError, RegistryError};

use super::envelope::Envelope;
use super::registry::{EventSet, EventType, EventTypeInfo, Registry};

/// Static ordering key for listener invocation.
///
/// All `Early` subscriptions of an event type are invoked before any
/// `Normal` one. Modules typically subscribe `Early` to their own event
/// type and `Normal` to everyone else's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// Invoked first.
    Early,
    /// Invoked after all `Early` subscriptions.
    Normal,
}

/// A module-registered callback invoked by the bus for every event of a
/// subscribed type.
///
/// The common implementation is
/// [`ForwardListener`](crate::ForwardListener), which copies relevant
/// payloads into a module mailbox. Custom implementations must follow the
/// same rules: no blocking, no envelope retention.
#[async_trait]
pub trait Listen<E: EventSet>: Send + Sync + 'static {
    /// Handles one event. Returns `true` if the event was relevant to the
    /// subscriber ("consumed"); the flag is advisory and never stops
    /// propagation.
    async fn on_event(&self, envelope: &Envelope<E>) -> bool;

    /// Returns the subscriber name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called once by [`BusBuilder::build`] with the finished bus, before any
    /// event is dispatched. Listeners that submit events themselves (e.g. to
    /// escalate an enqueue failure) capture the handle here.
    fn bind(&self, bus: &Bus<E>) {
        let _ = bus;
    }
}

/// One row of the static subscription table.
struct Subscription<E: EventSet> {
    /// Subscriber name, cached from the listener.
    module: &'static str,
    /// Event types this subscription accepts.
    types: Vec<EventType<E>>,
    /// Invocation tier.
    tier: Tier,
    /// The callback.
    listener: Arc<dyn Listen<E>>,
}

impl<E: EventSet> Subscription<E> {
    fn accepts(&self, ty: EventType<E>) -> bool {
        self.types.iter().any(|t| *t == ty)
    }
}

/// Builder for the type catalog and the subscription table.
///
/// Everything declared here is immutable once [`build`](Self::build) runs;
/// subscriptions never change at runtime.
pub struct BusBuilder<E: EventSet> {
    registry: Registry<E>,
    subscriptions: Vec<Subscription<E>>,
}

impl<E: EventSet> BusBuilder<E> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Registers an event type descriptor.
    ///
    /// Every type that will ever be submitted must be registered here, once.
    pub fn register(
        &mut self,
        info: &'static EventTypeInfo<E>,
    ) -> Result<EventType<E>, RegistryError> {
        self.registry.register(info)
    }

    /// Declares a subscription: `listener` will be invoked, at `tier`, for
    /// every submitted event whose type is in `types`.
    ///
    /// A module that wants different tiers for different types subscribes
    /// the same listener more than once.
    pub fn subscribe(
        &mut self,
        tier: Tier,
        types: Vec<EventType<E>>,
        listener: Arc<dyn Listen<E>>,
    ) -> &mut Self {
        self.subscriptions.push(Subscription {
            module: listener.name(),
            types,
            tier,
            listener,
        });
        self
    }

    /// Freezes the catalog and subscription table into a [`Bus`].
    ///
    /// Subscriptions are ordered by tier (stable, so declaration order is
    /// kept within a tier), and every listener's [`Listen::bind`] hook runs
    /// once with the finished bus.
    pub fn build(mut self) -> Bus<E> {
        self.subscriptions.sort_by_key(|s| s.tier);
        let bus = Bus {
            inner: Arc::new(BusInner {
                registry: self.registry,
                subscriptions: self.subscriptions,
            }),
        };
        for sub in &bus.inner.subscriptions {
            sub.listener.bind(&bus);
        }
        bus
    }
}

impl<E: EventSet> Default for BusBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

struct BusInner<E: EventSet> {
    registry: Registry<E>,
    subscriptions: Vec<Subscription<E>>,
}

/// Synchronous pub/sub router over a static subscription table.
///
/// Cheap to clone (internally an `Arc`); every module that submits events
/// holds its own handle.
pub struct Bus<E: EventSet> {
    inner: Arc<BusInner<E>>,
}

impl<E: EventSet> Clone for Bus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EventSet> Bus<E> {
    /// Submits one event: fans it out to every subscribed listener, in tier
    /// order, on the calling task, then destroys the envelope.
    ///
    /// Never suspends beyond the listeners' own bounded awaits. Submitting a
    /// type that was not registered is a programmer error and returns
    /// [`BusError::UnknownEventType`].
    pub async fn submit(&self, payload: E) -> Result<(), BusError> {
        let ty = payload.event_type();
        if !self.inner.registry.contains(ty) {
            error!(event = ty.name(), "submit of unregistered event type");
            return Err(BusError::UnknownEventType { name: ty.name() });
        }

        let envelope = Envelope::new(payload);
        if ty.flags().log_enabled {
            match ty.render_payload(envelope.payload()) {
                Some(rendered) => {
                    trace!(event = ty.name(), seq = envelope.seq(), payload = %rendered, "event submitted");
                }
                None => {
                    trace!(event = ty.name(), seq = envelope.seq(), payload = ?envelope.payload(), "event submitted");
                }
            }
        }

        for sub in &self.inner.subscriptions {
            if !sub.accepts(ty) {
                continue;
            }
            // Advisory only: dispatch never short-circuits on consumed.
            let consumed = sub.listener.on_event(&envelope).await;
            trace!(
                event = ty.name(),
                seq = envelope.seq(),
                module = sub.module,
                consumed,
                "listener returned"
            );
        }
        Ok(())
    }

    /// Read access to the frozen type catalog.
    pub fn registry(&self) -> &Registry<E> {
        &self.inner.registry
    }
}
