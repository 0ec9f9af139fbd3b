//! # Event envelope: header plus payload.
//!
//! An [`Envelope`] is constructed by the bus when a payload is submitted and
//! destroyed by the bus when the last listener has returned. In between,
//! listeners receive it by shared reference only — an envelope is never
//! cloned, never mutated, and no listener may retain a reference past its
//! call. A module that needs the data afterwards clones the payload into its
//! own mailbox message.
//!
//! ## Ordering
//! Each envelope carries a globally unique sequence number (`seq`) that
//! increases monotonically across all event types, alongside a wall-clock
//! timestamp for logs.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::registry::{EventSet, EventType};

/// Global sequence counter for envelope ordering.
static ENVELOPE_SEQ: AtomicU64 = AtomicU64::new(0);

/// One submitted event, owned by the bus for the duration of dispatch.
pub struct Envelope<E: EventSet> {
    /// Globally unique, monotonically increasing sequence number.
    seq: u64,
    /// Wall-clock timestamp taken at submission.
    at: SystemTime,
    /// Handle of the payload's event type, immutable for the lifetime of the
    /// envelope.
    ty: EventType<E>,
    /// The submitted payload.
    payload: E,
}

impl<E: EventSet> Envelope<E> {
    /// Stamps a new envelope with the next sequence number and the current
    /// wall-clock time.
    pub(crate) fn new(payload: E) -> Self {
        Self {
            seq: ENVELOPE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            ty: payload.event_type(),
            payload,
        }
    }

    /// Returns the global sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns the submission timestamp.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// Returns the handle of this event's type.
    #[inline]
    pub fn event_type(&self) -> EventType<E> {
        self.ty
    }

    /// True iff this envelope's recorded type equals `ty`.
    #[inline]
    pub fn is(&self, ty: EventType<E>) -> bool {
        self.ty == ty
    }

    /// Borrows the payload. Match on it exhaustively; variants not relevant
    /// to the caller are simply not copied anywhere.
    #[inline]
    pub fn payload(&self) -> &E {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::registry::{EventTypeFlags, EventTypeInfo};

    #[derive(Clone, Debug, PartialEq)]
    enum Probe {
        One,
        Two,
    }

    static TYPE_ONE: EventTypeInfo<Probe> = EventTypeInfo {
        name: "one",
        log_payload: None,
        flags: EventTypeFlags { log_enabled: false },
    };

    static TYPE_TWO: EventTypeInfo<Probe> = EventTypeInfo {
        name: "two",
        log_payload: None,
        flags: EventTypeFlags { log_enabled: false },
    };

    impl EventSet for Probe {
        fn event_type(&self) -> EventType<Probe> {
            match self {
                Probe::One => EventType::of(&TYPE_ONE),
                Probe::Two => EventType::of(&TYPE_TWO),
            }
        }
    }

    #[test]
    fn records_payload_type() {
        let env = Envelope::new(Probe::One);

        assert!(env.is(EventType::of(&TYPE_ONE)));
        assert!(!env.is(EventType::of(&TYPE_TWO)));
        assert_eq!(env.payload(), &Probe::One);
    }

    #[test]
    fn sequence_is_monotonic() {
        let first = Envelope::new(Probe::One);
        let second = Envelope::new(Probe::Two);

        assert!(second.seq() > first.seq());
    }
}
