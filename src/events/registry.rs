//! # Event type catalog.
//!
//! Every event kind the application submits is described by exactly one
//! static [`EventTypeInfo`], registered once during process-wide setup. The
//! copyable handle [`EventType`] wraps a reference to that descriptor;
//! **identity is the descriptor's address**, so two handles compare equal iff
//! they point at the same static. Name strings play no part in identity.
//!
//! The application's event enum implements [`EventSet`] to map each payload
//! variant to its handle. Payload access is ordinary exhaustive pattern
//! matching on the closed enum; there is no runtime cast.
//!
//! ## Example
//! ```rust
//! use modactor::{EventSet, EventType, EventTypeFlags, EventTypeInfo, Registry};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum AppEvent {
//!     Tick(u32),
//! }
//!
//! static TICK_EVENT: EventTypeInfo<AppEvent> = EventTypeInfo {
//!     name: "tick_event",
//!     log_payload: None,
//!     flags: EventTypeFlags { log_enabled: false },
//! };
//!
//! impl EventSet for AppEvent {
//!     fn event_type(&self) -> EventType<AppEvent> {
//!         match self {
//!             AppEvent::Tick(_) => EventType::of(&TICK_EVENT),
//!         }
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! let tick = registry.register(&TICK_EVENT).unwrap();
//! assert_eq!(AppEvent::Tick(7).event_type(), tick);
//! ```

use std::fmt;

use crate::error::RegistryError;

/// Creation flags of an event type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventTypeFlags {
    /// When set, every submission of this type is traced by the bus.
    pub log_enabled: bool,
}

/// Static descriptor of one event kind.
///
/// One `static` per event type; the address of that static is the type's
/// identity for the lifetime of the process.
pub struct EventTypeInfo<E: 'static> {
    /// Human-readable type name, used in logs and errors.
    pub name: &'static str,
    /// Optional payload renderer used when tracing submissions. When absent,
    /// the payload's `Debug` form is used instead.
    pub log_payload: Option<fn(&E) -> String>,
    /// Creation flags.
    pub flags: EventTypeFlags,
}

/// Copyable handle to a registered (or registrable) event type.
///
/// Equality is pointer equality on the underlying descriptor.
pub struct EventType<E: 'static> {
    info: &'static EventTypeInfo<E>,
}

impl<E: 'static> EventType<E> {
    /// Creates a handle from a static descriptor.
    #[inline]
    pub fn of(info: &'static EventTypeInfo<E>) -> Self {
        Self { info }
    }

    /// Returns the descriptor's name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.info.name
    }

    /// Returns the descriptor's creation flags.
    #[inline]
    pub fn flags(&self) -> EventTypeFlags {
        self.info.flags
    }

    /// Renders a payload with the descriptor's log function, if any.
    #[inline]
    pub(crate) fn render_payload(&self, payload: &E) -> Option<String> {
        self.info.log_payload.map(|f| f(payload))
    }
}

// Manual impls: derives would put bounds on `E`, which the handle never needs.
impl<E: 'static> Clone for EventType<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: 'static> Copy for EventType<E> {}

impl<E: 'static> PartialEq for EventType<E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.info, other.info)
    }
}

impl<E: 'static> Eq for EventType<E> {}

impl<E: 'static> fmt::Debug for EventType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventType").field(&self.info.name).finish()
    }
}

/// The application's closed event enum.
///
/// One variant per event category; [`EventSet::event_type`] maps each
/// variant to its static descriptor handle. Payloads must be cloneable so
/// listeners can copy them into module mailboxes — the bus itself never
/// clones, it hands out borrows only.
pub trait EventSet: Clone + fmt::Debug + Send + Sync + 'static {
    /// Returns the handle of this payload's event type.
    fn event_type(&self) -> EventType<Self>
    where
        Self: Sized;
}

/// Catalog of registered event types.
///
/// Populated during setup, read-only afterwards; lookups are a linear scan
/// over a handful of entries and never lock.
pub struct Registry<E: 'static> {
    types: Vec<EventType<E>>,
}

impl<E: 'static> Registry<E> {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Registers a descriptor and returns its handle.
    ///
    /// Each descriptor may be registered once; a second registration of the
    /// same static is [`RegistryError::DuplicateType`].
    pub fn register(
        &mut self,
        info: &'static EventTypeInfo<E>,
    ) -> Result<EventType<E>, RegistryError> {
        let handle = EventType::of(info);
        if self.contains(handle) {
            return Err(RegistryError::DuplicateType { name: info.name });
        }
        self.types.push(handle);
        Ok(handle)
    }

    /// Returns true if the handle's descriptor was registered.
    pub fn contains(&self, ty: EventType<E>) -> bool {
        self.types.iter().any(|t| *t == ty)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if nothing was registered yet.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<E: 'static> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Probe {
        A,
        B,
    }

    static TYPE_A: EventTypeInfo<Probe> = EventTypeInfo {
        name: "type_a",
        log_payload: None,
        flags: EventTypeFlags { log_enabled: false },
    };

    static TYPE_B: EventTypeInfo<Probe> = EventTypeInfo {
        name: "type_b",
        log_payload: Some(|p| format!("probe={p:?}")),
        flags: EventTypeFlags { log_enabled: true },
    };

    impl EventSet for Probe {
        fn event_type(&self) -> EventType<Probe> {
            match self {
                Probe::A => EventType::of(&TYPE_A),
                Probe::B => EventType::of(&TYPE_B),
            }
        }
    }

    #[test]
    fn identity_is_descriptor_address() {
        let a = EventType::of(&TYPE_A);
        let b = EventType::of(&TYPE_B);

        assert_eq!(a, EventType::of(&TYPE_A));
        assert_ne!(a, b);
        assert_eq!(Probe::A.event_type(), a);
        assert_ne!(Probe::A.event_type(), b);
        assert_eq!(Probe::B.event_type(), b);
    }

    #[test]
    fn register_round_trip() {
        let mut registry = Registry::new();
        let a = registry.register(&TYPE_A).unwrap();
        let b = registry.register(&TYPE_B).unwrap();

        assert!(registry.contains(a));
        assert!(registry.contains(b));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = Registry::new();
        registry.register(&TYPE_A).unwrap();

        let err = registry.register(&TYPE_A).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { name: "type_a" }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_type_not_contained() {
        let mut registry = Registry::new();
        registry.register(&TYPE_A).unwrap();

        assert!(!registry.contains(EventType::of(&TYPE_B)));
    }

    #[test]
    fn payload_renderer() {
        let b = EventType::of(&TYPE_B);
        assert_eq!(b.render_payload(&Probe::B).as_deref(), Some("probe=B"));

        let a = EventType::of(&TYPE_A);
        assert_eq!(a.render_payload(&Probe::A), None);
    }
}
