//! Typed events: catalog, envelope, and the bus that routes them.
//!
//! ## Contents
//! - [`EventTypeInfo`], [`EventType`], [`EventSet`], [`Registry`] — the
//!   static event type catalog and the handle identity model
//! - [`Envelope`] — header (type, seq, timestamp) plus payload, owned by the
//!   bus for the duration of one dispatch
//! - [`Bus`], [`BusBuilder`], [`Listen`], [`Tier`] — synchronous fan-out
//!   over a frozen subscription table
//!
//! ## Quick reference
//! - **Producers**: module actors and collaborator-callback translation
//!   points call [`Bus::submit`].
//! - **Consumers**: [`Listen`] implementations, typically
//!   [`ForwardListener`](crate::ForwardListener), which copy relevant
//!   payloads into module mailboxes.

mod bus;
mod envelope;
mod registry;

pub use bus::{Bus, BusBuilder, Listen, Tier};
pub use envelope::Envelope;
pub use registry::{EventSet, EventType, EventTypeFlags, EventTypeInfo, Registry};
